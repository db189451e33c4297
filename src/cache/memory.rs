//! Cache em memória com capacidade limitada.

use std::num::NonZeroUsize;

use lru::LruCache;

/// Capacidade usada quando a configurada é zero.
pub const DEFAULT_MEMORY_CAPACITY: usize = 1000;

/// Ocupação e contadores de acerto de um [`MemoryCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    pub len: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Mapa chave → valor sem expiração.
///
/// Ao atingir a capacidade, a entrada usada há mais tempo é descartada.
/// Não há controle de concorrência: quem precisar compartilhar entre
/// threads deve envolver o cache num `Mutex`.
pub struct MemoryCache<T> {
    cache: LruCache<String, T>,
    hits: u64,
    misses: u64,
}

impl<T> MemoryCache<T> {
    /// Cria um novo cache.
    ///
    /// # Argumentos
    /// - `capacity`: Número máximo de entradas (0 usa o padrão)
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_MEMORY_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(cap),
            hits: 0,
            misses: 0,
        }
    }

    /// Busca no cache.
    pub fn load(&mut self, key: &str) -> Option<&T> {
        match self.cache.get(key) {
            Some(value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Busca sem alterar a ordem LRU nem as estatísticas.
    pub fn peek(&self, key: &str) -> Option<&T> {
        self.cache.peek(key)
    }

    /// Insere ou substitui. Sempre retorna `true`.
    pub fn save(&mut self, key: impl Into<String>, data: T) -> bool {
        self.cache.put(key.into(), data);
        true
    }

    /// Remove uma entrada, se existir.
    pub fn delete(&mut self, key: &str) {
        self.cache.pop(key);
    }

    /// Limpa todo o cache.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Número de entradas.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Indica se o cache está vazio.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Retorna estatísticas do cache.
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            len: self.cache.len(),
            capacity: self.cache.cap().get(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

impl<T> Default for MemoryCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}
