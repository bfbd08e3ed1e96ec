//! Atomic condition matching.
//!
//! A [`Condition`](crate::Condition) names an entry field, a match type and a
//! pattern. Field dispatch is a closed enum lookup, and regex patterns are
//! compiled through a [`RegexCache`]: the process-wide one for the free
//! functions, or the one owned by a [`FilterEngine`](crate::FilterEngine).
//!
//! Matching conventions:
//! - Missing entry fields are matched as the empty string.
//! - Descriptions are matched by their text content, see [`plain_text`].
//! - Contains and regex matching ignore case unless the condition sets
//!   `case_sensitive` ([`DEFAULT_CASE_SENSITIVE`]).
//! - Regex matching has search semantics: a match anywhere in the field.

pub mod cache;
pub mod condition;
pub mod markup;

/// Case mode for conditions that do not specify one.
pub const DEFAULT_CASE_SENSITIVE: bool = false;

pub use cache::{global_regex_cache, init_global_cache, CacheConfig, CacheStats, RegexCache};
pub use condition::{evaluate, evaluate_with_cache, field_value, validate};
pub use markup::plain_text;
