//! # Feed Filter
//!
//! Boolean filter rules for RSS/Atom feed entries.
//!
//! A feed owns zero or more [`FilterSet`]s. Each set is a tree of
//! [`FilterGroup`]s (AND/OR, optional negation, arbitrary nesting) over
//! [`Condition`]s on an entry's title, link or description. The engine
//! evaluates an [`Entry`] against a feed's sets and returns a [`Decision`]:
//! whether the entry stays in the output feed and whether it may be sent
//! to AI summarization.
//!
//! Evaluation is pure: no I/O, no logging, no shared mutable state beyond a
//! cache of compiled regexes. The only evaluation error is a
//! [`ConfigurationError`] for a pattern that cannot be used, and it is always
//! returned to the caller. [`FeedPass`] is the caller-side wrapper that turns
//! such errors into a per-entry fallback and applies the summarization limit.
//!
//! ## Quick Start
//!
//! ```rust
//! use feed_filter::{decide, Entry, FilterSetLoader};
//!
//! let filter_sets = FilterSetLoader::from_yaml_str(r#"
//! - name: no-chess
//!   scope: feed
//!   action: filter_out_if_match
//!   groups:
//!     - conditions:
//!         - field: title
//!           match_type: contains
//!           pattern: chess
//! "#)?;
//!
//! let entry = Entry::new("Breaking: AI wins chess", "https://x/1", "long text");
//! let decision = decide(&entry, &filter_sets)?;
//! assert!(!decision.keep);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Feed Pass
//!
//! ```rust
//! use feed_filter::{Entry, FailurePolicy, FeedPass, FilterEngine, PassConfig};
//!
//! let engine = FilterEngine::from_yaml(r#"
//! - name: only-rust
//!   action: filter_for_if_match
//!   groups:
//!     - conditions:
//!         - {field: title_or_description, match_type: match_regex, pattern: "\\brust\\b"}
//! "#)?;
//!
//! let entries = vec![
//!     Entry::new("Rust 1.80 released", "https://x/1", ""),
//!     Entry::new("Go 1.23 released", "https://x/2", ""),
//! ];
//! let config = PassConfig::new()
//!     .with_failure_policy(FailurePolicy::KeepEntry)
//!     .with_summary_limit(5);
//! let report = FeedPass::new(&engine, config).run(&entries)?;
//! assert_eq!(report.kept_indices().collect::<Vec<_>>(), vec![0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod loader;
pub mod matcher;
pub mod model;
pub mod pass;

// Engine interface
pub use engine::{decide, explain, FilterEngine};
pub use filter::SetVerdict;

// Configuration and loading
pub use config::{EngineConfig, FailurePolicy, ParallelConfig, PassConfig};
pub use loader::FilterSetLoader;

// Core types and errors
pub use error::{ConfigurationError, EvalResult, FilterError, Result};
pub use model::{
    Condition, Decision, Entry, Field, FilterAction, FilterGroup, FilterScope, FilterSet,
    LogicalOp, MatchType,
};

// Caller boundary
pub use pass::{EntryFailure, FeedPass, PassReport};
