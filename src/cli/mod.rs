//! Interface de linha de comando do ttlmemo.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ttlmemo - inspeção e manutenção do cache em arquivos.
#[derive(Parser, Debug)]
#[command(name = "ttlmemo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração.
    #[arg(short, long, default_value = "ttlmemo.toml")]
    pub config: PathBuf,

    /// Modo verbose.
    #[arg(short, long)]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subdiretório do cache (nome da operação memoizada).
    #[arg(short, long, global = true)]
    pub prefix: Option<String>,

    /// Comando a executar.
    #[command(subcommand)]
    pub command: Commands,
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inicializa configuração no diretório atual.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Calcula a chave de cache para os argumentos dados (em JSON).
    Key {
        /// Argumentos posicionais, cada um um valor JSON.
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,

        /// Argumento nomeado no formato NOME=JSON.
        #[arg(short, long = "kwarg")]
        kwargs: Vec<String>,

        /// Ignora o primeiro argumento (receptor de método).
        #[arg(short, long)]
        method: bool,
    },

    /// Mostra uma entrada.
    Show {
        /// Chave da entrada.
        key: String,
    },

    /// Lista as chaves armazenadas.
    List,

    /// Expira uma entrada, ou todas se nenhuma chave for dada.
    Expire {
        /// Chave da entrada.
        key: Option<String>,
    },

    /// Remove uma entrada.
    Delete {
        /// Chave da entrada.
        key: String,
    },

    /// Remove todas as entradas.
    Clear,

    /// Mostra versão.
    Version,
}
