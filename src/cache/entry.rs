//! Entradas de cache e o envelope gravado em disco.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::MemoError;

/// Envelope persistido: `{"expires": "<ISO-8601>", "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Envelope<T> {
    pub expires: DateTime<Utc>,
    pub data: T,
}

/// Entrada lida do cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedData<T> {
    /// Valor armazenado.
    pub data: T,

    /// Momento a partir do qual a entrada é considerada velha.
    pub expires_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    /// Cria uma entrada.
    pub fn new(data: T, expires_at: DateTime<Utc>) -> Self {
        Self { data, expires_at }
    }

    /// Verifica se a entrada expirou em `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Verifica se a entrada já expirou.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Resultado tipado de uma leitura.
#[derive(Debug)]
pub enum LoadOutcome<T> {
    /// Entrada encontrada (fresca ou velha).
    Found(CachedData<T>),

    /// Nenhum arquivo para a chave.
    NotFound,

    /// O arquivo existe mas não pôde ser lido ou decodificado.
    Failed(MemoError),
}

impl<T> LoadOutcome<T> {
    /// Retorna a entrada, se houver.
    pub fn found(self) -> Option<CachedData<T>> {
        match self {
            Self::Found(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Leitura com semântica "velho mas disponível".
///
/// Quando nada utilizável existe, `data` é `None`, `expires_at` é a época
/// Unix e `is_expired` é `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    /// Valor armazenado, mesmo se expirado.
    pub data: Option<T>,

    /// Momento de expiração registrado.
    pub expires_at: DateTime<Utc>,

    /// Se `now > expires_at` no momento da leitura.
    pub is_expired: bool,
}

impl<T> Loaded<T> {
    /// Leitura vazia: força recomputação.
    pub fn missing() -> Self {
        Self {
            data: None,
            expires_at: DateTime::<Utc>::default(),
            is_expired: true,
        }
    }

    pub(crate) fn from_entry(entry: CachedData<T>, now: DateTime<Utc>) -> Self {
        let is_expired = entry.is_expired_at(now);
        Self {
            data: Some(entry.data),
            expires_at: entry.expires_at,
            is_expired,
        }
    }
}

/// Valores "vazios" não são guardados: `null`, `false`, `0`, `""`, `[]`, `{}`.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_missing_defaults() {
        let loaded: Loaded<Value> = Loaded::missing();
        assert!(loaded.data.is_none());
        assert_eq!(loaded.expires_at.timestamp(), 0);
        assert!(loaded.is_expired);
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let entry = CachedData::new(1, now);

        // Expira apenas quando now > expires_at
        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(now + Duration::milliseconds(1)));
    }

    #[test]
    fn test_stale_entry_keeps_data() {
        let now = Utc::now();
        let entry = CachedData::new("old", now - Duration::seconds(10));
        let loaded = Loaded::from_entry(entry, now);

        assert_eq!(loaded.data, Some("old"));
        assert!(loaded.is_expired);
    }

    #[test]
    fn test_envelope_format() {
        let expires = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let envelope = Envelope {
            expires,
            data: json!({"x": 1}),
        };

        let encoded = serde_json::to_value(&envelope).unwrap();
        assert_eq!(encoded["expires"], json!("2024-05-01T12:00:00Z"));
        assert_eq!(encoded["data"], json!({"x": 1}));
    }

    #[test]
    fn test_is_blank() {
        for blank in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(is_blank(&blank), "{} should be blank", blank);
        }
        for value in [json!(true), json!(1), json!(-0.5), json!("a"), json!([0]), json!({"a": null})] {
            assert!(!is_blank(&value), "{} should not be blank", value);
        }
    }

    #[test]
    fn test_load_outcome_found() {
        let found = LoadOutcome::Found(CachedData::new(7, Utc::now()));
        assert_eq!(found.found().map(|e| e.data), Some(7));

        let missing: LoadOutcome<i32> = LoadOutcome::NotFound;
        assert!(missing.found().is_none());
    }
}
