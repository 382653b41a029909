//! Caller-owned cache of compiled evaluators

use std::num::NonZeroUsize;

use log::trace;
use lru::LruCache;

use crate::engine::Engine;
use crate::error::Result;
use crate::eval::Evaluator;

/// Default number of cached evaluators
pub const DEFAULT_CACHE_SIZE: usize = 128;

/// LRU cache of evaluators keyed by expression text
///
/// The cache belongs to one caller; the engine itself stays stateless.
#[derive(Debug)]
pub struct ExpressionCache {
    engine: Engine,
    evaluators: LruCache<String, Evaluator>,
    hits: u64,
    misses: u64,
}

impl ExpressionCache {
    /// Cache holding up to `capacity` evaluators (0 means the default size)
    pub fn new(engine: Engine, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CACHE_SIZE))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            engine,
            evaluators: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached evaluator for `text`, compiling it on a miss
    ///
    /// Failed compilations are not cached.
    pub fn get_or_compile(&mut self, text: &str) -> Result<Evaluator> {
        if let Some(evaluator) = self.evaluators.get(text) {
            self.hits += 1;
            trace!("Cache hit for '{}'", text);
            return Ok(evaluator.clone());
        }

        self.misses += 1;
        let evaluator = self.engine.compile(text)?;
        self.evaluators.put(text.to_string(), evaluator.clone());
        Ok(evaluator)
    }

    /// Engine used on misses
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Number of lookups served from the cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups that compiled
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Fraction of lookups served from the cache
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Number of cached evaluators
    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    /// Drop every cached evaluator and reset the counters
    pub fn clear(&mut self) {
        self.evaluators.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
