//! Tipos compartilhados do ttlmemo.

pub mod config;
pub mod errors;
