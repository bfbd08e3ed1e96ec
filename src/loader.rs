//! Loading and save-time validation of filter set configuration.
//!
//! Filter sets are stored as a YAML or JSON sequence:
//!
//! ```yaml
//! - name: no-chess
//!   scope: feed                  # feed | summary_only
//!   action: filter_out_if_match  # filter_out_if_match | filter_for_if_match
//!   top_operator: and            # and | or
//!   groups:
//!     - operator: or
//!       negate: false
//!       conditions:
//!         - field: title         # title | link | description | title_or_description
//!           match_type: contains # contains | not_contains | match_regex | not_match_regex
//!           pattern: chess       #   | shorter_than | longer_than
//!           case_sensitive: false
//!       subgroups: []
//! ```

use crate::error::{ConfigurationError, FilterError, Result};
use crate::matcher;
use crate::model::FilterSet;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parses and validates filter set configuration.
pub struct FilterSetLoader;

impl FilterSetLoader {
    pub fn from_yaml_str(yaml: &str) -> Result<Vec<FilterSet>> {
        serde_yaml::from_str(yaml)
            .map_err(|e| FilterError::YamlError(format!("Failed to parse filter sets: {e}")))
    }

    pub fn from_json_str(json: &str) -> Result<Vec<FilterSet>> {
        serde_json::from_str(json)
            .map_err(|e| FilterError::JsonError(format!("Failed to parse filter sets: {e}")))
    }

    /// Read filter sets from a file: `.json` as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Vec<FilterSet>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Load a file and reject it unless [`validate`](Self::validate) passes.
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Vec<FilterSet>> {
        let filter_sets = Self::from_file(path)?;
        Self::validate(&filter_sets)?;
        Ok(filter_sets)
    }

    /// Check names are unique and every pattern is usable.
    ///
    /// Stops at the first problem; see
    /// [`configuration_errors`](Self::configuration_errors) for a full list.
    pub fn validate(filter_sets: &[FilterSet]) -> Result<()> {
        let mut names = HashSet::new();
        for filter_set in filter_sets {
            if !names.insert(filter_set.name.as_str()) {
                return Err(FilterError::DuplicateFilterSet(filter_set.name.clone()));
            }
        }

        match Self::configuration_errors(filter_sets).into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Every condition whose pattern cannot be evaluated, in tree order.
    pub fn configuration_errors(filter_sets: &[FilterSet]) -> Vec<ConfigurationError> {
        filter_sets
            .iter()
            .flat_map(|filter_set| filter_set.iter_conditions())
            .filter_map(|condition| matcher::validate(condition).err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FilterAction, FilterScope, LogicalOp, MatchType};

    const YAML: &str = r#"
- name: no-chess
  scope: feed
  action: filter_out_if_match
  groups:
    - operator: or
      conditions:
        - field: title
          match_type: contains
          pattern: chess
      subgroups:
        - negate: true
          conditions:
            - field: link
              match_type: match_regex
              pattern: "^https://"
- name: long-reads
  scope: summary_only
  action: filter_for_if_match
  top_operator: or
  groups:
    - conditions:
        - field: description
          match_type: longer_than
          pattern: "500"
"#;

    #[test]
    fn test_from_yaml_str() {
        let sets = FilterSetLoader::from_yaml_str(YAML).unwrap();
        assert_eq!(sets.len(), 2);

        let no_chess = &sets[0];
        assert_eq!(no_chess.scope, FilterScope::Feed);
        assert_eq!(no_chess.groups[0].operator, LogicalOp::Or);
        assert!(no_chess.groups[0].subgroups[0].negate);
        assert_eq!(
            no_chess.groups[0].subgroups[0].conditions[0].match_type,
            MatchType::MatchRegex
        );

        let long_reads = &sets[1];
        assert_eq!(long_reads.action, FilterAction::FilterForIfMatch);
        assert_eq!(long_reads.top_operator, LogicalOp::Or);
        assert!(FilterSetLoader::validate(&sets).is_ok());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[{"name": "x", "groups": [{"conditions": [
            {"field": "title_or_description", "match_type": "not_contains", "pattern": "ad"}
        ]}]}]"#;
        let sets = FilterSetLoader::from_json_str(json).unwrap();
        assert_eq!(sets[0].groups[0].conditions[0].match_type, MatchType::NotContains);
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let yaml = r#"
- name: x
  groups:
    - conditions:
        - field: author
          match_type: contains
          pattern: a
"#;
        assert!(matches!(
            FilterSetLoader::from_yaml_str(yaml),
            Err(FilterError::YamlError(_))
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let sets = vec![
            FilterSet::new("same", FilterScope::Feed, FilterAction::FilterOutIfMatch),
            FilterSet::new("same", FilterScope::SummaryOnly, FilterAction::FilterOutIfMatch),
        ];
        assert_eq!(
            FilterSetLoader::validate(&sets),
            Err(FilterError::DuplicateFilterSet("same".to_string()))
        );
    }

    #[test]
    fn test_configuration_errors_collects_all() {
        let yaml = r#"
- name: broken
  groups:
    - conditions:
        - {field: title, match_type: match_regex, pattern: "(unclosed"}
        - {field: title, match_type: contains, pattern: "(fine"}
      subgroups:
        - conditions:
            - {field: title, match_type: shorter_than, pattern: "zero"}
"#;
        let sets = FilterSetLoader::from_yaml_str(yaml).unwrap();
        let errors = FilterSetLoader::configuration_errors(&sets);
        let patterns: Vec<_> = errors.iter().map(|e| e.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["(unclosed", "zero"]);

        match FilterSetLoader::validate(&sets) {
            Err(FilterError::Configuration(err)) => assert_eq!(err.pattern, "(unclosed"),
            other => panic!("Expected configuration error, got {other:?}"),
        }
    }
}
