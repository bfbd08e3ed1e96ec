//! Configuration for the filter engine and the feed pass boundary.
//!
//! [`EngineConfig`] tunes how decisions are computed (parallel batches, the
//! engine's regex cache). [`PassConfig`] holds the policies the caller
//! applies around the engine: what to do with an entry whose filters cannot
//! be evaluated, and how many entries a single run may send to
//! summarization.
//!
//! Both deserialize from YAML or JSON with every field optional.

use crate::matcher::cache::CacheConfig;
use serde::{Deserialize, Serialize};

/// Parallel evaluation of entry batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Evaluate batches on the rayon thread pool.
    pub enable_event_parallelism: bool,
    /// Batches smaller than this are evaluated on the calling thread.
    pub min_batch_size_for_parallelism: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enable_event_parallelism: true,
            min_batch_size_for_parallelism: 64,
        }
    }
}

/// Engine configuration.
///
/// # Examples
///
/// ```rust
/// use feed_filter::EngineConfig;
///
/// // Sequential evaluation, small cache
/// let dev = EngineConfig::development();
/// assert!(!dev.parallel.enable_event_parallelism);
///
/// // Parallel from the first few entries on
/// let fast = EngineConfig::high_performance().with_min_batch_size(8);
/// assert_eq!(fast.parallel.min_batch_size_for_parallelism, 8);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub parallel: ParallelConfig,
    /// Sizing of the regex cache each engine owns.
    pub cache: CacheConfig,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequential evaluation for debugging and tests.
    pub fn development() -> Self {
        Self {
            parallel: ParallelConfig {
                enable_event_parallelism: false,
                ..Default::default()
            },
            cache: CacheConfig {
                max_size: 100,
                ..Default::default()
            },
        }
    }

    /// Parallel evaluation for feeds with many entries and large filter sets.
    pub fn high_performance() -> Self {
        Self {
            parallel: ParallelConfig {
                enable_event_parallelism: true,
                min_batch_size_for_parallelism: 16,
            },
            cache: CacheConfig {
                max_size: 5000,
                ..Default::default()
            },
        }
    }

    pub fn with_parallelism(mut self, enabled: bool) -> Self {
        self.parallel.enable_event_parallelism = enabled;
        self
    }

    pub fn with_min_batch_size(mut self, size: usize) -> Self {
        self.parallel.min_batch_size_for_parallelism = size;
        self
    }

    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache.max_size = size;
        self
    }
}

/// What a feed pass does with an entry whose filters fail to evaluate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep the entry in the feed but do not summarize it.
    #[default]
    KeepEntry,
    /// Drop the entry from the feed.
    SkipEntry,
    /// Fail the whole pass with the configuration error.
    AbortRun,
}

/// Feed pass configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    pub failure_policy: FailurePolicy,
    /// Upper bound on entries marked for summarization per pass.
    /// `None` means every qualifying entry is summarized.
    pub max_entries_to_summarize: Option<usize>,
}

impl PassConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_summary_limit(mut self, limit: usize) -> Self {
        self.max_entries_to_summarize = Some(limit);
        self
    }
}
