//! Tipos de erro do ttlmemo.

use thiserror::Error;

/// Tipo de resultado padrão do ttlmemo.
pub type MemoResult<T> = Result<T, MemoError>;

/// Erros possíveis no ttlmemo.
///
/// Apenas `Config` chega ao chamador das APIs de conveniência do cache;
/// falhas de armazenamento são registradas e convertidas em valores seguros.
#[derive(Error, Debug)]
pub enum MemoError {
    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Argumentos não serializáveis para a chave: {0}")]
    Key(String),

    #[error("Chave de cache inválida: '{0}'")]
    InvalidKey(String),

    #[error("{0}")]
    Other(String),
}

impl MemoError {
    /// Cria um erro genérico.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Indica se o erro é apenas a ausência de um arquivo.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = MemoError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        assert!(err.is_not_found());

        let err = MemoError::from(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "x"));
        assert!(!err.is_not_found());

        assert!(!MemoError::config("bad").is_not_found());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MemoError::config("storage_folder vazio").to_string(),
            "Erro de configuração: storage_folder vazio"
        );
        assert_eq!(
            MemoError::InvalidKey("../x".to_string()).to_string(),
            "Chave de cache inválida: '../x'"
        );
    }
}
