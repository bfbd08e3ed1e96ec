//! Per-entry keep/summarize decisions.

use crate::config::EngineConfig;
use crate::error::{EvalResult, Result};
use crate::filter::SetVerdict;
use crate::loader::FilterSetLoader;
use crate::matcher::{global_regex_cache, RegexCache};
use crate::model::{Decision, Entry, FilterScope, FilterSet};
use rayon::prelude::*;
use std::sync::Arc;

/// Judge an entry against every filter set, in order.
pub fn explain(entry: &Entry, filter_sets: &[FilterSet]) -> EvalResult<Vec<SetVerdict>> {
    explain_with_cache(entry, filter_sets, global_regex_cache())
}

fn explain_with_cache(
    entry: &Entry,
    filter_sets: &[FilterSet],
    cache: &RegexCache,
) -> EvalResult<Vec<SetVerdict>> {
    filter_sets
        .iter()
        .map(|filter_set| SetVerdict::judge_with_cache(filter_set, entry, cache))
        .collect()
}

/// Decide whether an entry is kept and whether it may be summarized.
///
/// Sets combine by AND across sets: the entry is kept only if every
/// [`FilterScope::Feed`] set approves it, and summarized only if every
/// [`FilterScope::SummaryOnly`] set approves it. `summarize` is computed
/// even for dropped entries. A configuration error in any set is returned
/// as is; no partial decision is produced.
///
/// # Example
/// ```rust
/// use feed_filter::{decide, Condition, Entry, Field, FilterAction, FilterGroup, FilterScope, FilterSet};
///
/// let entry = Entry::new("Breaking: AI wins chess", "https://x/1", "long text");
/// let no_chess = FilterSet::new("no-chess", FilterScope::Feed, FilterAction::FilterOutIfMatch)
///     .with_group(FilterGroup::and().with_condition(Condition::contains(Field::Title, "chess")));
///
/// let decision = decide(&entry, &[no_chess])?;
/// assert!(!decision.keep);
/// assert!(decision.summarize);
/// # Ok::<(), feed_filter::ConfigurationError>(())
/// ```
pub fn decide(entry: &Entry, filter_sets: &[FilterSet]) -> EvalResult<Decision> {
    decide_with_cache(entry, filter_sets, global_regex_cache())
}

fn decide_with_cache(
    entry: &Entry,
    filter_sets: &[FilterSet],
    cache: &RegexCache,
) -> EvalResult<Decision> {
    let mut decision = Decision::APPROVED;
    for filter_set in filter_sets {
        let verdict = SetVerdict::judge_with_cache(filter_set, entry, cache)?;
        apply_verdict(&mut decision, &verdict);
    }
    Ok(decision)
}

fn apply_verdict(decision: &mut Decision, verdict: &SetVerdict) {
    if verdict.approves {
        return;
    }
    match verdict.scope {
        FilterScope::Feed => decision.keep = false,
        FilterScope::SummaryOnly => decision.summarize = false,
    }
}

/// Filter engine bound to the filter sets of one feed.
///
/// The engine holds no per-evaluation state: every method takes `&self` and
/// an engine can be shared across threads. Regexes are compiled through a
/// cache owned by the engine and sized by [`EngineConfig::cache`]; clones of
/// an engine share it.
///
/// # Example
/// ```rust
/// use feed_filter::{Entry, FilterEngine};
///
/// let engine = FilterEngine::from_yaml(r#"
/// - name: summarize-long-reads
///   scope: summary_only
///   action: filter_for_if_match
///   groups:
///     - conditions:
///         - field: description
///           match_type: longer_than
///           pattern: "20"
/// "#)?;
///
/// let decision = engine.decide(&Entry::new("Short", "https://x/2", "tiny"))?;
/// assert!(decision.keep);
/// assert!(!decision.summarize);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct FilterEngine {
    filter_sets: Vec<FilterSet>,
    config: EngineConfig,
    regex_cache: Arc<RegexCache>,
}

impl FilterEngine {
    pub fn new(filter_sets: Vec<FilterSet>) -> Self {
        Self::with_config(filter_sets, EngineConfig::default())
    }

    pub fn with_config(filter_sets: Vec<FilterSet>, config: EngineConfig) -> Self {
        let regex_cache = Arc::new(RegexCache::with_config(config.cache.clone()));
        Self {
            filter_sets,
            config,
            regex_cache,
        }
    }

    /// Parse and validate filter sets from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_yaml_with_config(yaml, EngineConfig::default())
    }

    pub fn from_yaml_with_config(yaml: &str, config: EngineConfig) -> Result<Self> {
        let filter_sets = FilterSetLoader::from_yaml_str(yaml)?;
        FilterSetLoader::validate(&filter_sets)?;
        Ok(Self::with_config(filter_sets, config))
    }

    pub fn filter_sets(&self) -> &[FilterSet] {
        &self.filter_sets
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn regex_cache(&self) -> &RegexCache {
        &self.regex_cache
    }

    pub fn decide(&self, entry: &Entry) -> EvalResult<Decision> {
        decide_with_cache(entry, &self.filter_sets, &self.regex_cache)
    }

    pub fn explain(&self, entry: &Entry) -> EvalResult<Vec<SetVerdict>> {
        explain_with_cache(entry, &self.filter_sets, &self.regex_cache)
    }

    /// Decide a batch of entries, one result per entry in input order.
    ///
    /// Errors are reported per entry so one bad evaluation does not hide
    /// the decisions for the rest of the batch.
    pub fn decide_batch(&self, entries: &[Entry]) -> Vec<EvalResult<Decision>> {
        if self.should_parallelize(entries.len()) {
            entries.par_iter().map(|entry| self.decide(entry)).collect()
        } else {
            entries.iter().map(|entry| self.decide(entry)).collect()
        }
    }

    fn should_parallelize(&self, batch_size: usize) -> bool {
        let parallel = &self.config.parallel;
        parallel.enable_event_parallelism
            && batch_size >= parallel.min_batch_size_for_parallelism.max(2)
    }
}
