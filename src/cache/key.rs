//! Derivação de chaves de cache.
//!
//! A chave é o SHA-256, em hexadecimal, da serialização canônica de
//! `{"args": [...], "kwargs": {...}}`. Objetos são escritos com as chaves
//! ordenadas em qualquer profundidade, então a ordem de inserção dos
//! argumentos nomeados não altera a chave.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::{MemoError, MemoResult};

/// Como o primeiro argumento posicional deve ser tratado.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgsMode {
    /// Todos os argumentos participam da chave.
    #[default]
    Function,

    /// O primeiro argumento é o receptor (`self`) e fica fora da chave.
    Method,
}

/// Argumentos de uma chamada, já convertidos para JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    args: Vec<Value>,
    kwargs: BTreeMap<String, Value>,
}

impl CallArgs {
    /// Cria uma lista de argumentos vazia.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona um argumento posicional.
    pub fn arg<T: Serialize + ?Sized>(mut self, value: &T) -> MemoResult<Self> {
        self.args.push(to_json(value)?);
        Ok(self)
    }

    /// Adiciona um argumento nomeado. Um nome repetido substitui o anterior.
    pub fn kwarg<T: Serialize + ?Sized>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> MemoResult<Self> {
        self.kwargs.insert(name.into(), to_json(value)?);
        Ok(self)
    }

    /// Adiciona um argumento posicional já em JSON.
    pub fn push_arg(&mut self, value: Value) {
        self.args.push(value);
    }

    /// Adiciona um argumento nomeado já em JSON.
    pub fn push_kwarg(&mut self, name: impl Into<String>, value: Value) {
        self.kwargs.insert(name.into(), value);
    }

    /// Argumentos posicionais.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Argumentos nomeados.
    pub fn kwargs(&self) -> &BTreeMap<String, Value> {
        &self.kwargs
    }

    /// Serialização canônica usada como entrada do digest.
    pub fn canonical(&self, mode: ArgsMode) -> String {
        let positional = match mode {
            ArgsMode::Method if !self.args.is_empty() => &self.args[1..],
            _ => &self.args[..],
        };

        let mut out = String::from("{\"args\":");
        write_array(positional.iter(), &mut out);
        out.push_str(",\"kwargs\":");
        write_object(self.kwargs.iter(), &mut out);
        out.push('}');
        out
    }

    /// Deriva a chave de cache.
    pub fn key(&self, mode: ArgsMode) -> String {
        digest(&self.canonical(mode))
    }
}

/// Deriva a chave de cache de uma lista de argumentos.
pub fn make_key(args: &CallArgs, mode: ArgsMode) -> String {
    args.key(mode)
}

fn digest(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> MemoResult<Value> {
    serde_json::to_value(value).map_err(|e| MemoError::Key(e.to_string()))
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => write_array(items.iter(), out),
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            write_object(sorted.into_iter(), out);
        }
        // Escalares já têm forma única no serde_json
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_array<'a>(items: impl Iterator<Item = &'a Value>, out: &mut String) {
    out.push('[');
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_canonical(item, out);
    }
    out.push(']');
}

fn write_object<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>, out: &mut String) {
    out.push('{');
    for (i, (name, value)) in entries.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(name.clone()).to_string());
        out.push(':');
        write_canonical(value, out);
    }
    out.push('}');
}
