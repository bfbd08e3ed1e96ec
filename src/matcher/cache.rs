//! Process-wide regex compilation cache.
//!
//! Filter sets are reloaded before each feed pass, so the same patterns are
//! compiled over and over. This cache keeps compiled patterns keyed by the
//! pattern source and case mode. It is an optimization only: a miss simply
//! compiles the pattern again.

use crate::error::ConfigurationError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of compiled patterns kept. Zero disables caching.
    pub max_size: usize,

    /// Upper bound on the compiled program size of a single pattern.
    pub size_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            size_limit: 10 * (1 << 20),
        }
    }
}

/// Snapshot of cache counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_lookups: usize,
    pub hits: usize,
    pub misses: usize,
    pub compilations: usize,
    pub evictions: usize,
}

#[derive(Debug, Default)]
struct Counters {
    total_lookups: AtomicUsize,
    hits: AtomicUsize,
    misses: AtomicUsize,
    compilations: AtomicUsize,
    evictions: AtomicUsize,
}

#[derive(Debug)]
struct CachedRegex {
    regex: Arc<Regex>,
    access_count: AtomicUsize,
}

/// Compiled patterns split by case mode so lookups can borrow the pattern.
#[derive(Debug, Default)]
struct CacheStorage {
    case_sensitive: HashMap<String, CachedRegex>,
    case_insensitive: HashMap<String, CachedRegex>,
}

impl CacheStorage {
    fn bucket(&self, case_insensitive: bool) -> &HashMap<String, CachedRegex> {
        if case_insensitive {
            &self.case_insensitive
        } else {
            &self.case_sensitive
        }
    }

    fn bucket_mut(&mut self, case_insensitive: bool) -> &mut HashMap<String, CachedRegex> {
        if case_insensitive {
            &mut self.case_insensitive
        } else {
            &mut self.case_sensitive
        }
    }

    fn len(&self) -> usize {
        self.case_sensitive.len() + self.case_insensitive.len()
    }
}

/// Thread-safe cache of compiled regex patterns.
///
/// Lookups take a read lock; only compilations of new patterns take the
/// write lock. When full, the least accessed tenth of the entries is evicted.
#[derive(Debug)]
pub struct RegexCache {
    storage: RwLock<CacheStorage>,
    counters: Counters,
    config: CacheConfig,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            storage: RwLock::new(CacheStorage::default()),
            counters: Counters::default(),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get or compile a regex pattern.
    ///
    /// Compilation failures are returned as [`ConfigurationError`] and are
    /// never cached, so a fixed configuration is picked up on the next call.
    pub fn get_regex(
        &self,
        pattern: &str,
        case_insensitive: bool,
    ) -> Result<Arc<Regex>, ConfigurationError> {
        self.counters.total_lookups.fetch_add(1, Ordering::Relaxed);

        {
            let storage = self.storage.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = storage.bucket(case_insensitive).get(pattern) {
                cached.access_count.fetch_add(1, Ordering::Relaxed);
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(&cached.regex));
            }
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        let regex = Arc::new(self.compile(pattern, case_insensitive)?);

        if self.config.max_size > 0 {
            let mut storage = self.storage.write().unwrap_or_else(PoisonError::into_inner);
            if storage.len() >= self.config.max_size {
                self.evict_least_used(&mut storage);
            }
            let cached = storage
                .bucket_mut(case_insensitive)
                .entry(pattern.to_string())
                .or_insert_with(|| CachedRegex {
                    regex: Arc::clone(&regex),
                    access_count: AtomicUsize::new(1),
                });
            return Ok(Arc::clone(&cached.regex));
        }

        Ok(regex)
    }

    fn compile(&self, pattern: &str, case_insensitive: bool) -> Result<Regex, ConfigurationError> {
        self.counters.compilations.fetch_add(1, Ordering::Relaxed);
        RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .size_limit(self.config.size_limit)
            .build()
            .map_err(|e| ConfigurationError::new(pattern, e.to_string()))
    }

    fn evict_least_used(&self, storage: &mut CacheStorage) {
        let view: &CacheStorage = storage;
        let mut candidates: Vec<(bool, String, usize)> = [false, true]
            .into_iter()
            .flat_map(|case_insensitive| {
                view.bucket(case_insensitive)
                    .iter()
                    .map(move |(pattern, cached)| {
                        (
                            case_insensitive,
                            pattern.clone(),
                            cached.access_count.load(Ordering::Relaxed),
                        )
                    })
            })
            .collect();

        candidates.sort_by_key(|(_, _, count)| *count);

        // Evict up to 10% of cache size or at least 1 entry
        let evict_count = (self.config.max_size / 10).max(1);

        for (case_insensitive, pattern, _) in candidates.into_iter().take(evict_count) {
            storage.bucket_mut(case_insensitive).remove(&pattern);
            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_lookups: self.counters.total_lookups.load(Ordering::Relaxed),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            compilations: self.counters.compilations.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }

    pub fn hit_ratio(&self) -> f64 {
        let stats = self.stats();
        if stats.total_lookups == 0 {
            return 0.0;
        }
        stats.hits as f64 / stats.total_lookups as f64
    }

    pub fn size(&self) -> usize {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn clear(&self) {
        let mut storage = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        storage.case_sensitive.clear();
        storage.case_insensitive.clear();
    }

    /// Compile patterns ahead of a feed pass.
    pub fn precompile_patterns(
        &self,
        patterns: &[&str],
        case_insensitive: bool,
    ) -> Result<(), ConfigurationError> {
        for &pattern in patterns {
            self.get_regex(pattern, case_insensitive)?;
        }
        Ok(())
    }
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_CACHE: OnceLock<RegexCache> = OnceLock::new();

/// Get the global regex cache instance.
pub fn global_regex_cache() -> &'static RegexCache {
    GLOBAL_CACHE.get_or_init(RegexCache::new)
}

/// Initialize the global cache used by the free evaluation functions.
///
/// Must run before the first evaluation to take effect. Returns `false` when
/// the cache already exists and `config` was ignored. Engines own a separate
/// cache configured through [`EngineConfig`](crate::EngineConfig).
pub fn init_global_cache(config: CacheConfig) -> bool {
    GLOBAL_CACHE.set(RegexCache::with_config(config)).is_ok()
}
