//! Wrappers que memoizam o resultado de uma operação.
//!
//! Em vez de anexar o cache à função, cada wrapper é dono do seu cache e
//! recebe, a cada chamada, os argumentos (para a chave) e a operação:
//!
//! ```no_run
//! use ttlmemo::cache::{CallArgs, TtlFileCache, TtlMemo};
//!
//! # fn fetch(city: &str) -> Result<Vec<String>, std::io::Error> { Ok(vec![city.into()]) }
//! let memo = TtlMemo::new("fetch", TtlFileCache::new("/tmp/cache", Some("fetch"), None).ok());
//! let args = CallArgs::new().arg("vancouver")?;
//! let beaches = memo.call(&args, || fetch("vancouver"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::entry::{is_blank, Loaded};
use super::file::TtlFileCache;
use super::key::{ArgsMode, CallArgs};
use super::memory::MemoryCache;
use crate::reporting::{ErrorReporter, TracingReporter};
use crate::types::config::CacheConfig;
use crate::MemoResult;

/// Origem do sinal de refresh forçado.
#[derive(Clone)]
pub enum ForceRefresh {
    /// Valor fixo.
    Value(bool),

    /// Consultado a cada chamada.
    Dynamic(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl ForceRefresh {
    /// Cria uma origem dinâmica.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    /// Resolve o sinal.
    pub fn resolve(&self) -> bool {
        match self {
            Self::Value(value) => {
                tracing::debug!("Usando valor fixo para decidir o refresh forçado");
                *value
            }
            Self::Dynamic(f) => {
                tracing::debug!("Usando retorno da função para decidir o refresh forçado");
                f()
            }
        }
    }
}

impl From<bool> for ForceRefresh {
    fn from(value: bool) -> Self {
        Self::Value(value)
    }
}

impl fmt::Debug for ForceRefresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

fn is_blank_data<T: Serialize>(data: &T) -> bool {
    serde_json::to_value(data)
        .map(|value| is_blank(&value))
        .unwrap_or(true)
}

// ═══════════════════════════════════════════════════════════════════════════
// Wrapper com cache em arquivos
// ═══════════════════════════════════════════════════════════════════════════

/// Memoização persistente com TTL e fallback para dados velhos.
pub struct TtlMemo {
    name: String,
    cache: Option<TtlFileCache>,
    mode: ArgsMode,
    force_refresh: Option<ForceRefresh>,
    reporter: Arc<dyn ErrorReporter>,
}

impl TtlMemo {
    /// Cria o wrapper. Sem cache, toda chamada executa a operação.
    pub fn new(name: impl Into<String>, cache: Option<TtlFileCache>) -> Self {
        Self {
            name: name.into(),
            cache,
            mode: ArgsMode::Function,
            force_refresh: None,
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Cria o wrapper a partir da configuração, usando `name` como prefixo.
    ///
    /// Sem `storage_folder` configurado o cache fica desligado.
    pub fn from_config(config: &CacheConfig, name: &str) -> MemoResult<Self> {
        let cache = match config.storage_folder() {
            Some(_) => Some(TtlFileCache::from_config(config, Some(name))?),
            None => None,
        };
        Ok(Self::new(name, cache))
    }

    /// Define como o primeiro argumento entra na chave.
    pub fn with_mode(mut self, mode: ArgsMode) -> Self {
        self.mode = mode;
        self
    }

    /// Atalho para operações cujo primeiro argumento é o receptor.
    pub fn method(self) -> Self {
        self.with_mode(ArgsMode::Method)
    }

    /// Define a origem do refresh forçado.
    pub fn with_force_refresh(mut self, force_refresh: impl Into<ForceRefresh>) -> Self {
        self.force_refresh = Some(force_refresh.into());
        self
    }

    /// Define o destino das falhas.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Nome da operação.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cache em uso, se habilitado.
    pub fn cache(&self) -> Option<&TtlFileCache> {
        self.cache.as_ref()
    }

    /// Chave usada para os argumentos dados.
    pub fn key_for(&self, args: &CallArgs) -> String {
        args.key(self.mode)
    }

    /// Executa a operação passando pelo cache.
    ///
    /// 1. Sem cache configurado, executa direto.
    /// 2. Carrega a entrada da chave.
    /// 3. Refresh forçado: a origem configurada ou, sem ela, a expiração da
    ///    entrada; sempre verdadeiro quando não há dados.
    /// 4. Com refresh, executa. Em falha, reporta e serve os dados velhos se
    ///    existirem. Resultado vazio remove a entrada; os demais são gravados.
    /// 5. Sem refresh, devolve os dados do cache.
    pub fn call<T, E, F>(&self, args: &CallArgs, op: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
    {
        let Some(cache) = &self.cache else {
            tracing::debug!(
                "Executando '{}' direto: cache sem storage_folder",
                self.name
            );
            return op();
        };

        let key = self.key_for(args);
        tracing::debug!("Chave de cache de '{}': {}", self.name, key);

        let loaded: Loaded<T> = cache.load(&key);
        let mut force_refresh = match &self.force_refresh {
            Some(source) => source.resolve(),
            None => loaded.is_expired,
        };

        let cached = loaded.data.filter(|data| !is_blank_data(data));
        if cached.is_none() {
            tracing::debug!("Refresh forçado, entrada do cache vazia");
            force_refresh = true;
        }

        let cached = match cached {
            Some(data) if !force_refresh => {
                tracing::debug!(
                    "Servindo resposta do cache, expira em {}",
                    loaded.expires_at
                );
                return Ok(data);
            }
            other => other,
        };

        tracing::debug!("Executando a operação memoizada '{}'", self.name);
        match op() {
            Ok(fresh) => {
                if is_blank_data(&fresh) {
                    tracing::debug!("Resposta vazia, removendo entrada antiga do cache");
                    cache.delete(&key);
                } else if cache.save(&key, &fresh) {
                    tracing::debug!("Resposta de '{}' salva no cache", self.name);
                }
                Ok(fresh)
            }
            Err(e) => {
                self.reporter.capture(&self.name, &e);
                match cached {
                    Some(stale) => {
                        tracing::warn!(
                            "Servindo resposta do cache, '{}' falhou: {}",
                            self.name,
                            e
                        );
                        Ok(stale)
                    }
                    None => Err(e),
                }
            }
        }
    }
}

impl fmt::Debug for TtlMemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlMemo")
            .field("name", &self.name)
            .field("cache", &self.cache)
            .field("mode", &self.mode)
            .field("force_refresh", &self.force_refresh)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Wrapper em memória
// ═══════════════════════════════════════════════════════════════════════════

/// Memoização em memória, sem expiração.
///
/// Um valor guardado vazio (`null`, `false`, `0`, `""`, `[]`, `{}`) conta
/// como ausente e a operação roda de novo.
pub struct Memo<T> {
    cache: MemoryCache<T>,
    mode: ArgsMode,
    force_refresh: Option<ForceRefresh>,
}

impl<T: Clone + Serialize> Memo<T> {
    /// Cria o wrapper com a capacidade dada.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: MemoryCache::new(capacity),
            mode: ArgsMode::Function,
            force_refresh: None,
        }
    }

    /// Cria o wrapper com a capacidade configurada.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.memory_capacity)
    }

    /// Define como o primeiro argumento entra na chave.
    pub fn with_mode(mut self, mode: ArgsMode) -> Self {
        self.mode = mode;
        self
    }

    /// Atalho para operações cujo primeiro argumento é o receptor.
    pub fn method(self) -> Self {
        self.with_mode(ArgsMode::Method)
    }

    /// Define a origem do refresh forçado.
    pub fn with_force_refresh(mut self, force_refresh: impl Into<ForceRefresh>) -> Self {
        self.force_refresh = Some(force_refresh.into());
        self
    }

    /// Cache interno.
    pub fn cache(&self) -> &MemoryCache<T> {
        &self.cache
    }

    /// Cache interno, mutável.
    pub fn cache_mut(&mut self) -> &mut MemoryCache<T> {
        &mut self.cache
    }

    /// Executa a operação se não houver valor guardado (ou só um vazio) ou se
    /// o refresh for forçado.
    ///
    /// Erros da operação são propagados e nada é gravado.
    pub fn call<E, F>(&mut self, args: &CallArgs, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let force_refresh = self
            .force_refresh
            .as_ref()
            .map(ForceRefresh::resolve)
            .unwrap_or(false);

        let key = args.key(self.mode);
        if !force_refresh {
            if let Some(data) = self.cache.load(&key).filter(|d| !is_blank_data(*d)) {
                tracing::debug!("Servindo resposta do cache em memória");
                return Ok(data.clone());
            }
        }

        tracing::debug!("Executando a operação memoizada");
        let data = op()?;
        self.cache.save(key, data.clone());
        Ok(data)
    }
}
