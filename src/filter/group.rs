//! Filter group evaluation.

use crate::error::EvalResult;
use crate::matcher::{self, global_regex_cache, RegexCache};
use crate::model::{Entry, FilterGroup};

/// Evaluation state of one group on the work stack.
struct Frame<'g> {
    group: &'g FilterGroup,
    next_subgroup: usize,
    acc: bool,
}

impl<'g> Frame<'g> {
    /// Start a group: its conditions are folded immediately, subgroups later.
    fn enter(group: &'g FilterGroup, entry: &Entry, cache: &RegexCache) -> EvalResult<Self> {
        let mut acc = group.operator.identity();
        for condition in &group.conditions {
            let matched = matcher::evaluate_with_cache(condition, entry, cache)?;
            acc = group.operator.combine(acc, matched);
        }
        Ok(Self {
            group,
            next_subgroup: 0,
            acc,
        })
    }

    fn absorb(&mut self, subgroup_result: bool) {
        self.acc = self.group.operator.combine(self.acc, subgroup_result);
    }

    fn finish(&self) -> bool {
        self.acc != self.group.negate
    }
}

/// Evaluate a group against an entry.
///
/// Conditions come first, then subgroups, all folded with the group's
/// operator; an empty AND group is true and an empty OR group is false
/// before `negate` is applied. Every operand is evaluated, so an invalid
/// pattern anywhere in the tree is reported even if the result was already
/// decided. Nesting is walked with a heap stack and has no depth limit.
pub fn evaluate(group: &FilterGroup, entry: &Entry) -> EvalResult<bool> {
    evaluate_with_cache(group, entry, global_regex_cache())
}

pub fn evaluate_with_cache(
    group: &FilterGroup,
    entry: &Entry,
    cache: &RegexCache,
) -> EvalResult<bool> {
    let mut stack = vec![Frame::enter(group, entry, cache)?];
    let mut result = group.operator.identity() != group.negate;

    while let Some(frame) = stack.last_mut() {
        let current = frame.group;
        if let Some(child) = current.subgroups.get(frame.next_subgroup) {
            frame.next_subgroup += 1;
            stack.push(Frame::enter(child, entry, cache)?);
            continue;
        }

        let outcome = frame.finish();
        stack.pop();
        match stack.last_mut() {
            Some(parent) => parent.absorb(outcome),
            None => result = outcome,
        }
    }

    Ok(result)
}
