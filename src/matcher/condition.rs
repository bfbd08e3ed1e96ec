//! Evaluation of a single condition against an entry.

use crate::error::{ConfigurationError, EvalResult};
use crate::matcher::cache::{global_regex_cache, RegexCache};
use crate::matcher::markup::plain_text;
use crate::model::{Condition, Entry, Field, MatchType};
use std::borrow::Cow;

/// Resolve a field to the text conditions match against.
///
/// Missing fields are empty strings. Descriptions are reduced to their
/// readable text with [`plain_text`].
pub fn field_value(entry: &Entry, field: Field) -> Cow<'_, str> {
    match field {
        Field::Title => Cow::Borrowed(entry.title.as_str()),
        Field::Link => Cow::Borrowed(entry.link.as_str()),
        Field::Description => plain_text(&entry.description),
        Field::TitleOrDescription => {
            let description = plain_text(&entry.description);
            match (entry.title.is_empty(), description.is_empty()) {
                (true, _) => description,
                (_, true) => Cow::Borrowed(entry.title.as_str()),
                _ => Cow::Owned(format!("{} {}", entry.title, description)),
            }
        }
    }
}

/// Evaluate one condition against one entry.
///
/// Fails only when the condition's pattern is unusable: a regex that does not
/// compile, or a length threshold that is not a positive integer.
///
/// # Example
/// ```rust
/// use feed_filter::{matcher, Condition, Entry, Field};
///
/// let entry = Entry::new("Breaking: AI wins chess", "https://x/1", "long text");
/// let condition = Condition::contains(Field::Title, "CHESS");
/// assert!(matcher::evaluate(&condition, &entry)?);
/// # Ok::<(), feed_filter::ConfigurationError>(())
/// ```
pub fn evaluate(condition: &Condition, entry: &Entry) -> EvalResult<bool> {
    evaluate_with_cache(condition, entry, global_regex_cache())
}

/// [`evaluate`] with regexes compiled through `cache`.
pub fn evaluate_with_cache(
    condition: &Condition,
    entry: &Entry,
    cache: &RegexCache,
) -> EvalResult<bool> {
    let value = field_value(entry, condition.field);
    let pattern = condition.pattern.as_str();
    let case_sensitive = condition.case_sensitive;

    match condition.match_type {
        MatchType::Contains => Ok(contains(&value, pattern, case_sensitive)),
        MatchType::NotContains => Ok(!contains(&value, pattern, case_sensitive)),
        MatchType::MatchRegex => regex_search(cache, &value, pattern, case_sensitive),
        MatchType::NotMatchRegex => {
            regex_search(cache, &value, pattern, case_sensitive).map(|found| !found)
        }
        MatchType::ShorterThan => Ok(value.chars().count() < length_threshold(pattern)?),
        MatchType::LongerThan => Ok(value.chars().count() > length_threshold(pattern)?),
    }
}

/// Check that a condition's pattern can be evaluated, without an entry.
pub fn validate(condition: &Condition) -> EvalResult<()> {
    let pattern = condition.pattern.as_str();
    match condition.match_type {
        MatchType::MatchRegex | MatchType::NotMatchRegex => global_regex_cache()
            .get_regex(pattern, !condition.case_sensitive)
            .map(|_| ()),
        MatchType::ShorterThan | MatchType::LongerThan => length_threshold(pattern).map(|_| ()),
        MatchType::Contains | MatchType::NotContains => Ok(()),
    }
}

fn contains(value: &str, pattern: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        value.contains(pattern)
    } else {
        value.to_lowercase().contains(&pattern.to_lowercase())
    }
}

fn regex_search(
    cache: &RegexCache,
    value: &str,
    pattern: &str,
    case_sensitive: bool,
) -> EvalResult<bool> {
    let regex = cache.get_regex(pattern, !case_sensitive)?;
    Ok(regex.is_match(value))
}

/// Thresholds are plain ASCII digits: no sign, no whitespace, not zero.
fn length_threshold(pattern: &str) -> EvalResult<usize> {
    let digits_only = !pattern.is_empty() && pattern.bytes().all(|b| b.is_ascii_digit());
    match pattern.parse::<usize>() {
        Ok(threshold) if digits_only && threshold > 0 => Ok(threshold),
        _ => Err(ConfigurationError::new(
            pattern,
            "length threshold must be a positive integer",
        )),
    }
}
