//! # ttlmemo
//!
//! Memoização durável para operações caras.
//!
//! O resultado de uma chamada é guardado em disco, indexado pelo SHA-256
//! dos seus argumentos, e servido até expirar. Quando a recomputação falha,
//! o valor velho é devolvido no lugar do erro.
//!
//! ## Módulos
//!
//! - [`cache`] - Chaves, cache em memória, cache em arquivos e wrappers
//! - [`reporting`] - Destino das falhas de recomputação
//! - [`types`] - Configuração e erros
//! - `cli` - Interface de linha de comando (feature `cli`)

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod reporting;
pub mod types;

pub use cache::{ArgsMode, CallArgs, ForceRefresh, Memo, MemoryCache, TtlFileCache, TtlMemo};
pub use reporting::{ErrorReporter, NoopReporter, TracingReporter};
pub use types::config::Config;
pub use types::errors::{MemoError, MemoResult};
