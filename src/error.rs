//! Error types for the feed filter crate.

use thiserror::Error;

/// Result alias for loading, validation and feed passes.
pub type Result<T> = std::result::Result<T, FilterError>;

/// Result alias for evaluation. Evaluation can only fail on bad configuration.
pub type EvalResult<T> = std::result::Result<T, ConfigurationError>;

/// A condition whose pattern cannot be used for matching.
///
/// Raised when a regex pattern does not compile or a length threshold is not
/// a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid pattern '{pattern}': {reason}")]
pub struct ConfigurationError {
    pub pattern: String,
    pub reason: String,
}

impl ConfigurationError {
    pub fn new(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Duplicate filter set name: {0}")]
    DuplicateFilterSet(String),
    #[error("YAML parsing error: {0}")]
    YamlError(String),
    #[error("JSON parsing error: {0}")]
    JsonError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for FilterError {
    fn from(err: std::io::Error) -> Self {
        FilterError::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for FilterError {
    fn from(err: serde_yaml::Error) -> Self {
        FilterError::YamlError(err.to_string())
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::JsonError(err.to_string())
    }
}
