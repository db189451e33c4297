//! Cache em arquivos com expiração por tempo.
//!
//! Cada chave vira um arquivo JSON em `<storage_folder>/<prefix>/<chave>`
//! contendo `{"expires": ..., "data": ...}`. Leituras de entradas vencidas
//! ainda devolvem os dados, marcados como expirados.
//!
//! Falhas de IO nunca sobem para o chamador das operações de conveniência
//! (`load`, `save`, `delete`, ...): são registradas e viram valores seguros.
//! As variantes `try_*` expõem o erro tipado.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::entry::{is_blank, CachedData, Envelope, LoadOutcome, Loaded};
use crate::types::config::CacheConfig;
use crate::{MemoError, MemoResult};

/// TTL padrão em segundos (15 minutos).
pub const DEFAULT_TTL_SECS: u64 = 900;

/// Maior TTL aceito (100 anos).
const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Cache persistente com TTL, um arquivo por chave.
#[derive(Debug, Clone)]
pub struct TtlFileCache {
    storage_folder: PathBuf,
    prefix: Option<String>,
    default_ttl: u64,
}

impl TtlFileCache {
    /// Cria um cache.
    ///
    /// # Argumentos
    /// - `storage_folder`: Diretório raiz, obrigatório e não vazio
    /// - `prefix`: Subdiretório opcional (normalmente o nome da operação)
    /// - `default_ttl`: TTL em segundos; ausente ou não positivo usa 900
    pub fn new<P: AsRef<Path>>(
        storage_folder: P,
        prefix: Option<&str>,
        default_ttl: Option<i64>,
    ) -> MemoResult<Self> {
        let storage_folder = storage_folder.as_ref();
        if storage_folder.as_os_str().is_empty() {
            return Err(MemoError::config("storage_folder deve ser um diretório válido"));
        }

        let default_ttl = match default_ttl {
            Some(secs) if secs > 0 => (secs as u64).min(MAX_TTL_SECS),
            Some(secs) => {
                tracing::warn!(
                    "TTL inválido ({}s), usando o padrão de {}s",
                    secs,
                    DEFAULT_TTL_SECS
                );
                DEFAULT_TTL_SECS
            }
            None => DEFAULT_TTL_SECS,
        };

        Ok(Self {
            storage_folder: storage_folder.to_path_buf(),
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
            default_ttl,
        })
    }

    /// Cria um cache a partir da configuração.
    ///
    /// Falha com erro de configuração se `storage_folder` não estiver definido.
    pub fn from_config(config: &CacheConfig, prefix: Option<&str>) -> MemoResult<Self> {
        let folder = config
            .storage_folder()
            .ok_or_else(|| MemoError::config("cache.storage_folder não configurado"))?;
        Self::new(folder, prefix, Some(config.ttl_secs))
    }

    /// Diretório onde as entradas ficam.
    pub fn storage_path(&self) -> PathBuf {
        match &self.prefix {
            Some(prefix) => self.storage_folder.join(prefix),
            None => self.storage_folder.clone(),
        }
    }

    /// Prefixo configurado.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// TTL padrão em segundos.
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Caminho do arquivo de uma chave.
    pub fn entry_path(&self, key: &str) -> MemoResult<PathBuf> {
        validate_key(key)?;
        Ok(self.storage_path().join(key))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Leitura
    // ═══════════════════════════════════════════════════════════════════════

    /// Lê uma entrada distinguindo ausência de falha.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> LoadOutcome<T> {
        match self.read_entry(key) {
            Ok(entry) => LoadOutcome::Found(entry),
            Err(e) if e.is_not_found() => LoadOutcome::NotFound,
            Err(e) => LoadOutcome::Failed(e),
        }
    }

    /// Lê uma entrada.
    ///
    /// Entradas vencidas são devolvidas com `is_expired = true`. Qualquer
    /// falha, inclusive ausência, devolve [`Loaded::missing`].
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Loaded<T> {
        match self.try_load(key) {
            LoadOutcome::Found(entry) => Loaded::from_entry(entry, Utc::now()),
            LoadOutcome::NotFound => {
                tracing::debug!("Entrada '{}' não encontrada", key);
                Loaded::missing()
            }
            LoadOutcome::Failed(e) => {
                tracing::warn!("Falha ao ler entrada '{}': {}", key, e);
                Loaded::missing()
            }
        }
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &str) -> MemoResult<CachedData<T>> {
        let path = self.entry_path(key)?;
        let content = fs::read_to_string(path)?;
        let envelope: Envelope<T> = serde_json::from_str(&content)?;
        Ok(CachedData::new(envelope.data, envelope.expires))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Escrita
    // ═══════════════════════════════════════════════════════════════════════

    /// Grava uma entrada com expiração explícita.
    ///
    /// O conteúdo vai para um arquivo temporário oculto, exclusivo desta
    /// escrita, e é renomeado no lugar. Leitores nunca veem uma entrada pela
    /// metade e escritores concorrentes da mesma chave não se atropelam.
    pub fn try_save<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
        expires_at: DateTime<Utc>,
    ) -> MemoResult<()> {
        let path = self.entry_path(key)?;
        let dir = self.storage_path();
        fs::create_dir_all(&dir)?;

        let envelope = Envelope {
            expires: expires_at,
            data,
        };
        let json = serde_json::to_string(&envelope)?;

        let mut temp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(&dir)?;
        temp.write_all(json.as_bytes())?;
        // Em caso de falha o temporário é removido junto com o erro.
        temp.persist(&path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Grava com o TTL padrão.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> bool {
        self.save_with_ttl(key, data, self.default_ttl)
    }

    /// Grava com um TTL específico em segundos (0 usa o padrão).
    pub fn save_with_ttl<T: Serialize + ?Sized>(&self, key: &str, data: &T, ttl_secs: u64) -> bool {
        let ttl = if ttl_secs == 0 { self.default_ttl } else { ttl_secs };
        self.save_logged(key, data, expiry_after(Utc::now(), ttl))
    }

    /// Grava já expirada (`expires = now`).
    pub fn save_expired<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> bool {
        self.save_logged(key, data, Utc::now())
    }

    fn save_logged<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
        expires_at: DateTime<Utc>,
    ) -> bool {
        match self.try_save(key, data, expires_at) {
            Ok(()) => {
                tracing::debug!("Entrada '{}' gravada, expira em {}", key, expires_at);
                true
            }
            Err(e) => {
                tracing::warn!("Falha ao gravar entrada '{}': {}", key, e);
                false
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Remoção e expiração
    // ═══════════════════════════════════════════════════════════════════════

    /// Remove o arquivo de uma entrada.
    pub fn try_delete(&self, key: &str) -> MemoResult<()> {
        fs::remove_file(self.entry_path(key)?)?;
        Ok(())
    }

    /// Remove uma entrada. Retorna `false` se não existir ou se a remoção falhar.
    pub fn delete(&self, key: &str) -> bool {
        match self.try_delete(key) {
            Ok(()) => {
                tracing::debug!("Entrada '{}' removida", key);
                true
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("Entrada '{}' não existe, nada a remover", key);
                false
            }
            Err(e) => {
                tracing::warn!("Falha ao remover entrada '{}': {}", key, e);
                false
            }
        }
    }

    /// Expira uma entrada.
    ///
    /// Dados existentes são regravados com expiração imediata; sem dados
    /// utilizáveis, a entrada é removida.
    pub fn expire(&self, key: &str) -> bool {
        let loaded: Loaded<Value> = self.load(key);
        match loaded.data {
            Some(data) if !is_blank(&data) => self.save_expired(key, &data),
            _ => self.delete(key),
        }
    }

    /// Expira todas as entradas do diretório.
    ///
    /// Continua após falhas individuais. Retorna quantas entradas foram
    /// tratadas com sucesso.
    pub fn expire_all(&self) -> usize {
        self.keys()
            .iter()
            .filter(|key| self.expire(key))
            .count()
    }

    /// Lista as chaves presentes no diretório.
    pub fn keys(&self) -> Vec<String> {
        let dir = self.storage_path();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("Falha ao listar {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut keys: Vec<String> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Falha ao ler item de {}: {}", dir.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| validate_key(name).is_ok())
            .collect();

        keys.sort();
        keys
    }

    /// Remove o diretório inteiro de armazenamento.
    pub fn try_clear(&self) -> MemoResult<()> {
        match fs::remove_dir_all(self.storage_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove todas as entradas. Retorna `false` se a remoção falhar.
    pub fn clear(&self) -> bool {
        match self.try_clear() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    "Falha ao limpar {}: {}",
                    self.storage_path().display(),
                    e
                );
                false
            }
        }
    }
}

/// Rejeita chaves que não podem ser um nome de arquivo simples.
fn validate_key(key: &str) -> MemoResult<()> {
    let invalid = key.is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\', '\0']);

    if invalid {
        Err(MemoError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}

fn expiry_after(now: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    let ttl = Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64);
    now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
