//! Implementação dos comandos CLI do ttlmemo.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde_json::Value;

use crate::cache::{ArgsMode, CallArgs, Loaded, TtlFileCache};
use crate::types::config::{default_storage_folder, Config};

/// Initializes configuration in the specified directory.
pub fn init(path: Option<PathBuf>) -> anyhow::Result<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join("ttlmemo.toml");

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        return Ok(());
    }

    let mut config = Config::default_config();
    config.cache.storage_folder = default_storage_folder();
    config.save(&config_path)?;

    println!("Configuration created at: {}", config_path.display());
    match &config.cache.storage_folder {
        Some(folder) => println!("Storage folder: {}", folder.display()),
        None => println!("No platform cache directory found; set cache.storage_folder."),
    }

    Ok(())
}

/// Imprime a chave de cache dos argumentos.
pub fn key(args: &[String], kwargs: &[String], method: bool) -> anyhow::Result<()> {
    let call_args = parse_call_args(args, kwargs)?;
    let mode = if method {
        ArgsMode::Method
    } else {
        ArgsMode::Function
    };

    println!("{}", call_args.key(mode));
    Ok(())
}

/// Converte argumentos da linha de comando em `CallArgs`.
pub fn parse_call_args(args: &[String], kwargs: &[String]) -> anyhow::Result<CallArgs> {
    let mut call_args = CallArgs::new();

    for raw in args {
        let value: Value = serde_json::from_str(raw)
            .with_context(|| format!("Argumento não é JSON válido: {}", raw))?;
        call_args.push_arg(value);
    }

    for raw in kwargs {
        let Some((name, json)) = raw.split_once('=') else {
            bail!("Argumento nomeado deve ter o formato NOME=JSON: {}", raw);
        };
        let value: Value = serde_json::from_str(json)
            .with_context(|| format!("Valor de '{}' não é JSON válido: {}", name, json))?;
        call_args.push_kwarg(name, value);
    }

    Ok(call_args)
}

/// Mostra uma entrada.
pub fn show(key: &str, prefix: Option<&str>, config: &Config) -> anyhow::Result<()> {
    let cache = open_cache(prefix, config)?;
    let loaded: Loaded<Value> = cache.load(key);

    let Some(data) = loaded.data else {
        bail!("Entrada '{}' não encontrada em {}", key, cache.storage_path().display());
    };

    println!("key:     {}", key);
    println!("expires: {}", loaded.expires_at.to_rfc3339());
    println!("expired: {}", loaded.is_expired);
    println!("data:");
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

/// Lista as chaves.
pub fn list(prefix: Option<&str>, config: &Config) -> anyhow::Result<()> {
    let cache = open_cache(prefix, config)?;
    for key in cache.keys() {
        println!("{}", key);
    }
    Ok(())
}

/// Expira uma entrada ou todas.
pub fn expire(key: Option<&str>, prefix: Option<&str>, config: &Config) -> anyhow::Result<()> {
    let cache = open_cache(prefix, config)?;

    match key {
        Some(key) => {
            if cache.expire(key) {
                println!("Entrada '{}' expirada", key);
            } else {
                println!("Entrada '{}' não encontrada", key);
            }
        }
        None => {
            let count = cache.expire_all();
            println!("{} entradas expiradas", count);
        }
    }
    Ok(())
}

/// Remove uma entrada.
pub fn delete(key: &str, prefix: Option<&str>, config: &Config) -> anyhow::Result<()> {
    let cache = open_cache(prefix, config)?;
    if !cache.delete(key) {
        bail!("Entrada '{}' não encontrada em {}", key, cache.storage_path().display());
    }
    println!("Entrada '{}' removida", key);
    Ok(())
}

/// Remove todas as entradas.
pub fn clear(prefix: Option<&str>, config: &Config) -> anyhow::Result<()> {
    let cache = open_cache(prefix, config)?;
    if !cache.clear() {
        bail!("Falha ao limpar {}", cache.storage_path().display());
    }
    println!("Cache limpo: {}", cache.storage_path().display());
    Ok(())
}

/// Mostra versão.
pub fn version() {
    println!("ttlmemo {}", env!("CARGO_PKG_VERSION"));
}

fn open_cache(prefix: Option<&str>, config: &Config) -> anyhow::Result<TtlFileCache> {
    let cache = TtlFileCache::from_config(&config.cache, prefix)
        .context("Defina cache.storage_folder ou TTLMEMO_STORAGE_FOLDER")?;
    tracing::debug!("Usando cache em {}", cache.storage_path().display());
    Ok(cache)
}

/// Carrega a configuração, aplicando as variáveis de ambiente.
pub fn load_config(path: &Path) -> Config {
    let mut config = if path.exists() {
        Config::load(path).unwrap_or_else(|e| {
            eprintln!("Aviso: configuração inválida em {}: {}", path.display(), e);
            Config::default_config()
        })
    } else {
        Config::default_config()
    };
    config.apply_env();
    config
}
