//! Filter set evaluation and per-set verdicts.

use crate::error::EvalResult;
use crate::filter::group;
use crate::matcher::{global_regex_cache, RegexCache};
use crate::model::{Entry, FilterScope, FilterSet};
use serde::Serialize;

/// Raw matched result of a filter set, before scope and action apply.
///
/// Every group is evaluated and the results are folded with the set's top
/// operator, using the same empty-list identities as groups.
pub fn evaluate(filter_set: &FilterSet, entry: &Entry) -> EvalResult<bool> {
    evaluate_with_cache(filter_set, entry, global_regex_cache())
}

pub fn evaluate_with_cache(
    filter_set: &FilterSet,
    entry: &Entry,
    cache: &RegexCache,
) -> EvalResult<bool> {
    let mut matched = filter_set.top_operator.identity();
    for filter_group in &filter_set.groups {
        let result = group::evaluate_with_cache(filter_group, entry, cache)?;
        matched = filter_set.top_operator.combine(matched, result);
    }
    Ok(matched)
}

/// How one filter set judged one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetVerdict {
    pub name: String,
    pub scope: FilterScope,
    pub matched: bool,
    /// False when the set votes to drop (or, for summary sets, not summarize).
    pub approves: bool,
}

impl SetVerdict {
    pub fn judge(filter_set: &FilterSet, entry: &Entry) -> EvalResult<Self> {
        Self::judge_with_cache(filter_set, entry, global_regex_cache())
    }

    pub fn judge_with_cache(
        filter_set: &FilterSet,
        entry: &Entry,
        cache: &RegexCache,
    ) -> EvalResult<Self> {
        let matched = evaluate_with_cache(filter_set, entry, cache)?;
        Ok(Self {
            name: filter_set.name.clone(),
            scope: filter_set.scope,
            matched,
            approves: filter_set.action.approves(matched),
        })
    }
}
