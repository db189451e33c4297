//! Reporte de falhas de recomputação.
//!
//! O wrapper [`TtlMemo`](crate::cache::TtlMemo) avisa um `ErrorReporter`
//! sempre que a operação memoizada falha, antes de decidir entre servir
//! dados velhos ou propagar o erro. Integrações com serviços externos
//! implementam este trait.

use std::fmt;

/// Destino de falhas da operação memoizada.
pub trait ErrorReporter: Send + Sync {
    /// Registra uma falha.
    ///
    /// # Argumentos
    /// - `operation`: Nome da operação memoizada
    /// - `error`: Erro devolvido pela operação
    fn capture(&self, operation: &str, error: &dyn fmt::Display);
}

/// Registra falhas via `tracing` em nível `error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn capture(&self, operation: &str, error: &dyn fmt::Display) {
        tracing::error!(operation = %operation, "Falha na operação memoizada: {}", error);
    }
}

/// Descarta as falhas.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn capture(&self, _operation: &str, _error: &dyn fmt::Display) {}
}
