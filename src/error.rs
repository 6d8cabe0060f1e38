//! Error types shared across the resolver.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Failure to compile a path template.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A custom parameter pattern is not a valid regular expression.
    #[error("invalid pattern in route path \"{template}\": {source}")]
    InvalidRegex {
        template: String,
        #[source]
        source: regex::Error,
    },
}

/// Failure to render a concrete path from a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FillError {
    /// A required parameter was not supplied.
    #[error("Expected \"{param}\" to be defined")]
    MissingParam { param: String },

    /// A supplied value does not satisfy the parameter's pattern.
    #[error("Expected \"{param}\" to match \"{pattern}\", but received \"{value}\"")]
    Mismatch {
        param: String,
        pattern: String,
        value: String,
    },
}

/// Top-level error for router construction.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}
