//! Rule model for feed entry filtering.
//!
//! This module defines the configuration tree (conditions, groups, sets)
//! and the entry and decision types that flow through evaluation. All types
//! round-trip through serde using `snake_case` names so filter sets can be
//! stored as YAML or JSON.

use serde::{Deserialize, Serialize};

/// One feed item being evaluated.
///
/// Fields missing from the source feed are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    /// Entry body; may contain markup.
    #[serde(default)]
    pub description: String,
}

impl Entry {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            description: description.into(),
        }
    }
}

/// Entry attribute a condition looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Link,
    Description,
    /// Title and description joined by a single space.
    TitleOrDescription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Contains,
    NotContains,
    MatchRegex,
    NotMatchRegex,
    /// Field length (in chars) below the threshold given as the pattern.
    ShorterThan,
    /// Field length (in chars) above the threshold given as the pattern.
    LongerThan,
}

impl MatchType {
    /// Whether the pattern is interpreted as a regular expression.
    pub fn is_regex(self) -> bool {
        matches!(self, MatchType::MatchRegex | MatchType::NotMatchRegex)
    }

    /// Whether the pattern is interpreted as a length threshold.
    pub fn is_length(self) -> bool {
        matches!(self, MatchType::ShorterThan | MatchType::LongerThan)
    }
}

/// Atomic rule: a field, a match type and a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub field: Field,
    pub match_type: MatchType,
    pub pattern: String,
    /// Applies to the contains and regex variants.
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
}

fn default_case_sensitive() -> bool {
    crate::matcher::DEFAULT_CASE_SENSITIVE
}

impl Condition {
    pub fn new(field: Field, match_type: MatchType, pattern: impl Into<String>) -> Self {
        Self {
            field,
            match_type,
            pattern: pattern.into(),
            case_sensitive: default_case_sensitive(),
        }
    }

    pub fn contains(field: Field, pattern: impl Into<String>) -> Self {
        Self::new(field, MatchType::Contains, pattern)
    }

    pub fn not_contains(field: Field, pattern: impl Into<String>) -> Self {
        Self::new(field, MatchType::NotContains, pattern)
    }

    pub fn regex(field: Field, pattern: impl Into<String>) -> Self {
        Self::new(field, MatchType::MatchRegex, pattern)
    }

    pub fn not_regex(field: Field, pattern: impl Into<String>) -> Self {
        Self::new(field, MatchType::NotMatchRegex, pattern)
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

/// Operator combining a flat list of boolean results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

impl LogicalOp {
    /// Result of combining zero operands: AND is true, OR is false.
    pub fn identity(self) -> bool {
        match self {
            LogicalOp::And => true,
            LogicalOp::Or => false,
        }
    }

    pub fn combine(self, acc: bool, value: bool) -> bool {
        match self {
            LogicalOp::And => acc && value,
            LogicalOp::Or => acc || value,
        }
    }

    pub fn fold<I>(self, values: I) -> bool
    where
        I: IntoIterator<Item = bool>,
    {
        values
            .into_iter()
            .fold(self.identity(), |acc, value| self.combine(acc, value))
    }
}

/// Boolean composition of conditions and nested groups.
///
/// Conditions and subgroups are combined as one flat list by `operator`,
/// then inverted when `negate` is set. Groups form a strict tree: each
/// subgroup is owned by exactly one parent.
///
/// Groups implement `Drop`, so build them with [`FilterGroup::new`] and the
/// `with_*` methods or a full struct literal.
///
/// Evaluation, cloning, comparison and drop walk the tree with a heap stack
/// and accept any depth. `Debug` and serde recurse per level, so formatting
/// or serializing trees nested many thousands of levels deep can exhaust the
/// thread's stack.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FilterGroup {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub subgroups: Vec<FilterGroup>,
    #[serde(default)]
    pub operator: LogicalOp,
    #[serde(default)]
    pub negate: bool,
}

impl FilterGroup {
    pub fn new(operator: LogicalOp) -> Self {
        Self {
            conditions: Vec::new(),
            subgroups: Vec::new(),
            operator,
            negate: false,
        }
    }

    pub fn and() -> Self {
        Self::new(LogicalOp::And)
    }

    pub fn or() -> Self {
        Self::new(LogicalOp::Or)
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_subgroup(mut self, group: FilterGroup) -> Self {
        self.subgroups.push(group);
        self
    }

    pub fn negated(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    /// Depth of the deepest nesting, where a group without subgroups is 1.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut pending = vec![(self, 1usize)];
        while let Some((group, depth)) = pending.pop() {
            max_depth = max_depth.max(depth);
            pending.extend(group.subgroups.iter().map(|g| (g, depth + 1)));
        }
        max_depth
    }

    /// All conditions in the tree, parents before children.
    pub fn iter_conditions(&self) -> impl Iterator<Item = &Condition> {
        let mut groups = Vec::new();
        let mut pending = vec![self];
        while let Some(group) = pending.pop() {
            groups.push(group);
            pending.extend(group.subgroups.iter().rev());
        }
        groups.into_iter().flat_map(|g| g.conditions.iter())
    }
}

// Children are cloned before their parent; each stack slot collects the
// finished clones of its group's subgroups.
impl Clone for FilterGroup {
    fn clone(&self) -> Self {
        let mut stack = vec![(self, Vec::with_capacity(self.subgroups.len()))];
        let mut root = None;

        while let Some((source, cloned)) = stack.last_mut() {
            let current: &FilterGroup = *source;
            if let Some(child) = current.subgroups.get(cloned.len()) {
                stack.push((child, Vec::with_capacity(child.subgroups.len())));
                continue;
            }

            let subgroups = std::mem::take(cloned);
            stack.pop();
            let copy = FilterGroup {
                conditions: current.conditions.clone(),
                subgroups,
                operator: current.operator,
                negate: current.negate,
            };
            match stack.last_mut() {
                Some((_, siblings)) => siblings.push(copy),
                None => root = Some(copy),
            }
        }

        root.unwrap_or_default()
    }
}

impl PartialEq for FilterGroup {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.operator != right.operator
                || left.negate != right.negate
                || left.conditions != right.conditions
                || left.subgroups.len() != right.subgroups.len()
            {
                return false;
            }
            pending.extend(left.subgroups.iter().zip(&right.subgroups));
        }
        true
    }
}

impl Eq for FilterGroup {}

// Unlinks subgroups onto a heap worklist so dropping a deeply nested tree
// does not recurse.
impl Drop for FilterGroup {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.subgroups);
        while let Some(mut group) = pending.pop() {
            pending.append(&mut group.subgroups);
        }
    }
}

/// What a filter set's verdict controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterScope {
    /// A drop vote removes the entry from the output feed.
    #[default]
    Feed,
    /// A drop vote only disables AI summarization for the entry.
    SummaryOnly,
}

/// How a set's matched result is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterAction {
    /// Matching entries are rejected.
    #[default]
    FilterOutIfMatch,
    /// Only matching entries are accepted.
    FilterForIfMatch,
}

impl FilterAction {
    /// Whether an entry with the given matched result is approved.
    pub fn approves(self, matched: bool) -> bool {
        match self {
            FilterAction::FilterOutIfMatch => !matched,
            FilterAction::FilterForIfMatch => matched,
        }
    }
}

/// Named, ordered collection of top-level groups belonging to one feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<FilterGroup>,
    #[serde(default)]
    pub top_operator: LogicalOp,
    #[serde(default)]
    pub scope: FilterScope,
    #[serde(default)]
    pub action: FilterAction,
}

impl FilterSet {
    pub fn new(name: impl Into<String>, scope: FilterScope, action: FilterAction) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
            top_operator: LogicalOp::And,
            scope,
            action,
        }
    }

    pub fn with_group(mut self, group: FilterGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_top_operator(mut self, operator: LogicalOp) -> Self {
        self.top_operator = operator;
        self
    }

    /// All conditions across every group of the set.
    pub fn iter_conditions(&self) -> impl Iterator<Item = &Condition> {
        self.groups.iter().flat_map(|group| group.iter_conditions())
    }
}

/// Engine output for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub keep: bool,
    pub summarize: bool,
}

impl Decision {
    /// Keep the entry and allow summarization.
    pub const APPROVED: Decision = Decision {
        keep: true,
        summarize: true,
    };
}

impl Default for Decision {
    fn default() -> Self {
        Self::APPROVED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_op_identity() {
        assert!(LogicalOp::And.identity());
        assert!(!LogicalOp::Or.identity());
        assert!(LogicalOp::And.fold(std::iter::empty()));
        assert!(!LogicalOp::Or.fold(std::iter::empty()));
    }

    #[test]
    fn test_logical_op_fold() {
        assert!(LogicalOp::And.fold([true, true]));
        assert!(!LogicalOp::And.fold([true, false]));
        assert!(LogicalOp::Or.fold([false, true]));
        assert!(!LogicalOp::Or.fold([false, false]));
    }

    #[test]
    fn test_action_approves() {
        assert!(!FilterAction::FilterOutIfMatch.approves(true));
        assert!(FilterAction::FilterOutIfMatch.approves(false));
        assert!(FilterAction::FilterForIfMatch.approves(true));
        assert!(!FilterAction::FilterForIfMatch.approves(false));
    }

    #[test]
    fn test_match_type_classes() {
        assert!(MatchType::MatchRegex.is_regex());
        assert!(MatchType::NotMatchRegex.is_regex());
        assert!(!MatchType::Contains.is_regex());
        assert!(MatchType::ShorterThan.is_length());
        assert!(!MatchType::NotContains.is_length());
    }

    #[test]
    fn test_condition_defaults_to_case_insensitive() {
        let condition = Condition::contains(Field::Title, "rust");
        assert!(!condition.case_sensitive);
        assert!(condition.case_sensitive(true).case_sensitive);
    }

    #[test]
    fn test_group_depth_and_conditions() {
        let group = FilterGroup::or()
            .with_condition(Condition::contains(Field::Title, "a"))
            .with_subgroup(
                FilterGroup::and()
                    .with_condition(Condition::contains(Field::Link, "b"))
                    .with_subgroup(
                        FilterGroup::and().with_condition(Condition::contains(Field::Title, "c")),
                    ),
            );

        assert_eq!(group.depth(), 3);
        let patterns: Vec<_> = group.iter_conditions().map(|c| c.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_deep_group_drop_does_not_overflow() {
        let mut group = FilterGroup::and();
        for _ in 0..200_000 {
            group = FilterGroup::or().with_subgroup(group);
        }
        assert_eq!(group.subgroups.len(), 1);
        drop(group);
    }

    #[test]
    fn test_clone_and_eq_compare_whole_tree() {
        let group = FilterGroup::or()
            .with_condition(Condition::contains(Field::Title, "a"))
            .with_subgroup(FilterGroup::and().negated(true))
            .with_subgroup(
                FilterGroup::and()
                    .with_condition(Condition::regex(Field::Link, "b"))
                    .with_subgroup(FilterGroup::or()),
            );

        let copy = group.clone();
        assert_eq!(copy, group);
        assert_eq!(copy.depth(), 3);
        assert!(copy.subgroups[0].negate);

        let changed = FilterGroup::or()
            .with_condition(Condition::contains(Field::Title, "a"))
            .with_subgroup(FilterGroup::and().negated(true))
            .with_subgroup(
                FilterGroup::and()
                    .with_condition(Condition::regex(Field::Link, "b"))
                    .with_subgroup(FilterGroup::and()),
            );
        assert_ne!(changed, group);
    }

    #[test]
    fn test_deep_group_clone_and_eq_do_not_overflow() {
        let mut group = FilterGroup::and().with_condition(Condition::contains(Field::Title, "leaf"));
        for _ in 0..100_000 {
            group = FilterGroup::or().with_subgroup(group);
        }

        let copy = group.clone();
        assert_eq!(copy, group);
        assert_eq!(copy.depth(), 100_001);
        assert_eq!(copy.iter_conditions().count(), 1);
    }

    #[test]
    fn test_entry_missing_fields_deserialize_empty() {
        let entry: Entry = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(entry.title, "Only a title");
        assert_eq!(entry.link, "");
        assert_eq!(entry.description, "");
    }

    #[test]
    fn test_filter_set_yaml_defaults() {
        let yaml = r#"
name: chess
groups:
  - conditions:
      - field: title
        match_type: contains
        pattern: chess
"#;
        let set: FilterSet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(set.name, "chess");
        assert_eq!(set.top_operator, LogicalOp::And);
        assert_eq!(set.scope, FilterScope::Feed);
        assert_eq!(set.action, FilterAction::FilterOutIfMatch);
        assert_eq!(set.groups[0].operator, LogicalOp::And);
        assert!(!set.groups[0].negate);
        assert!(!set.groups[0].conditions[0].case_sensitive);
    }

    #[test]
    fn test_decision_default_is_approved() {
        assert_eq!(
            Decision::default(),
            Decision {
                keep: true,
                summarize: true
            }
        );
    }
}
