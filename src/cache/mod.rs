//! Caches e memoização.
//!
//! - [`key`]: chaves derivadas dos argumentos da chamada
//! - [`memory`]: cache em memória com capacidade limitada
//! - [`file`]: cache em arquivos com TTL
//! - [`memoize`]: wrappers que usam os caches acima

mod entry;
pub mod file;
pub mod key;
pub mod memoize;
pub mod memory;

pub use entry::{is_blank, CachedData, LoadOutcome, Loaded};
pub use file::{TtlFileCache, DEFAULT_TTL_SECS};
pub use key::{make_key, ArgsMode, CallArgs};
pub use memoize::{ForceRefresh, Memo, TtlMemo};
pub use memory::{MemoryStats, MemoryCache, DEFAULT_MEMORY_CAPACITY};
