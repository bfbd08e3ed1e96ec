//! Feed pass: the caller side of the engine.
//!
//! A pass runs the engine over the entries of one feed fetch, applies the
//! configured [`FailurePolicy`] to entries whose filters cannot be evaluated,
//! and caps how many entries are handed to summarization. This is the only
//! place in the crate that logs.

use crate::config::{FailurePolicy, PassConfig};
use crate::engine::FilterEngine;
use crate::error::{ConfigurationError, FilterError, Result};
use crate::model::{Decision, Entry};
use tracing::{debug, info, warn};

/// An entry whose filters failed to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub index: usize,
    pub title: String,
    pub error: ConfigurationError,
}

/// Outcome of a pass, one decision per input entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub decisions: Vec<Decision>,
    pub failures: Vec<EntryFailure>,
    /// Entries that qualified for summarization but exceeded the pass limit.
    pub summaries_deferred: usize,
}

impl PassReport {
    pub fn kept_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.keep).count()
    }

    pub fn dropped_count(&self) -> usize {
        self.decisions.len() - self.kept_count()
    }

    /// Indices of entries that stay in the output feed.
    pub fn kept_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.keep)
            .map(|(i, _)| i)
    }

    /// Indices of kept entries to send to summarization.
    pub fn summarize_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.keep && d.summarize)
            .map(|(i, _)| i)
    }
}

/// One run of the engine over a feed's entries.
pub struct FeedPass<'a> {
    engine: &'a FilterEngine,
    config: PassConfig,
}

impl<'a> FeedPass<'a> {
    pub fn new(engine: &'a FilterEngine, config: PassConfig) -> Self {
        Self { engine, config }
    }

    /// Decide every entry and apply the pass policies.
    ///
    /// Returns an error only under [`FailurePolicy::AbortRun`].
    pub fn run(&self, entries: &[Entry]) -> Result<PassReport> {
        let results = self.engine.decide_batch(entries);
        let mut report = PassReport {
            decisions: Vec::with_capacity(entries.len()),
            ..Default::default()
        };
        let mut summaries_granted = 0usize;

        for (index, (entry, result)) in entries.iter().zip(results).enumerate() {
            let mut decision = match result {
                Ok(decision) => decision,
                Err(error) => {
                    warn!(
                        index,
                        title = %entry.title,
                        pattern = %error.pattern,
                        reason = %error.reason,
                        policy = ?self.config.failure_policy,
                        "Filter evaluation failed"
                    );
                    let fallback = match self.config.failure_policy {
                        FailurePolicy::KeepEntry => Decision {
                            keep: true,
                            summarize: false,
                        },
                        FailurePolicy::SkipEntry => Decision {
                            keep: false,
                            summarize: false,
                        },
                        FailurePolicy::AbortRun => return Err(FilterError::Configuration(error)),
                    };
                    report.failures.push(EntryFailure {
                        index,
                        title: entry.title.clone(),
                        error,
                    });
                    fallback
                }
            };

            if !decision.keep {
                debug!(index, title = %entry.title, "Entry filtered out");
            } else if decision.summarize {
                let within_limit = self
                    .config
                    .max_entries_to_summarize
                    .map_or(true, |limit| summaries_granted < limit);
                if within_limit {
                    summaries_granted += 1;
                } else {
                    decision.summarize = false;
                    report.summaries_deferred += 1;
                }
            }

            report.decisions.push(decision);
        }

        info!(
            entries = entries.len(),
            kept = report.kept_count(),
            summarize = summaries_granted,
            deferred = report.summaries_deferred,
            failures = report.failures.len(),
            "Feed pass complete"
        );

        Ok(report)
    }
}
