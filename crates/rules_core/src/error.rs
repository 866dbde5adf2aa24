//! Error types for rule handling.
//!
//! Only configuration problems surface as errors. A value that fails a check
//! is recorded in the validator's error map instead.

use thiserror::Error;

/// Result type for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Errors that can occur while resolving or executing rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Handler name not found in the local overrides or the provider
    #[error("Unknown handler: {0}")]
    UnknownHandler(String),

    /// A rule was invoked without an option it cannot run without
    #[error("Rule '{rule}' requires the '{option}' option")]
    MissingOption {
        /// Handler name
        rule: String,
        /// Name of the missing option
        option: String,
    },

    /// An option was supplied but could not be interpreted
    #[error("Invalid '{option}' option for rule '{rule}': {message}")]
    InvalidOption {
        /// Handler name
        rule: String,
        /// Option name
        option: String,
        /// Description of the problem
        message: String,
    },

    /// Invalid regex pattern
    #[error("Invalid regex pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: String },

    /// Rule declaration has a shape that cannot be normalized
    #[error("Invalid rule declaration: {0}")]
    InvalidDeclaration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RuleError {
    /// Creates a new unknown handler error.
    pub fn unknown_handler(name: impl Into<String>) -> Self {
        Self::UnknownHandler(name.into())
    }

    /// Creates a new missing option error.
    pub fn missing_option(rule: impl Into<String>, option: impl Into<String>) -> Self {
        Self::MissingOption {
            rule: rule.into(),
            option: option.into(),
        }
    }

    /// Creates a new invalid option error.
    pub fn invalid_option(
        rule: impl Into<String>,
        option: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            rule: rule.into(),
            option: option.into(),
            message: message.into(),
        }
    }

    /// Creates a new invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, error: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            error: error.to_string(),
        }
    }
}
