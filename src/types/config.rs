//! Configuration for ttlmemo.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::MemoResult;

/// Environment variable that overrides `cache.storage_folder`.
pub const ENV_STORAGE_FOLDER: &str = "TTLMEMO_STORAGE_FOLDER";

/// Environment variable that overrides `cache.ttl_secs`.
pub const ENV_TTL: &str = "TTLMEMO_TTL";

/// Main configuration for ttlmemo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Root folder for file cache entries. Absent disables the file cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_folder: Option<PathBuf>,

    /// Default entry time to live in seconds. Non-positive values fall back to 900.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: i64,

    /// Maximum number of entries held by in-memory caches.
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            storage_folder: None,
            ttl_secs: default_cache_ttl(),
            memory_capacity: default_memory_capacity(),
        }
    }
}

impl CacheConfig {
    /// Returns the storage folder if one is configured and non-empty.
    pub fn storage_folder(&self) -> Option<&Path> {
        self.storage_folder
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

fn default_cache_ttl() -> i64 {
    900 // 15 minutes
}

fn default_memory_capacity() -> usize {
    1000
}

/// Suggested storage folder under the platform cache directory.
pub fn default_storage_folder() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("ttlmemo"))
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> MemoResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> MemoResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Tries to load configuration from current directory or uses default.
    pub fn load_or_default() -> Self {
        Self::load("ttlmemo.toml").unwrap_or_else(|_| Self::default_config())
    }

    /// Applies `TTLMEMO_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Applies overrides using the given variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(folder) = lookup(ENV_STORAGE_FOLDER) {
            self.cache.storage_folder = if folder.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(folder))
            };
        }

        if let Some(ttl) = lookup(ENV_TTL) {
            match ttl.trim().parse::<i64>() {
                Ok(secs) => self.cache.ttl_secs = secs,
                Err(_) => tracing::warn!("Ignoring {}={:?}: not an integer", ENV_TTL, ttl),
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
