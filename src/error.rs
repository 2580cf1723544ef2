//! Error types for configuration, argument validation and catalog loading
//!
//! Resolution itself never fails; these errors are only raised while building
//! a configuration, declaring a parameter, or loading templates.

use thiserror::Error;

/// An invalid resolver configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A delimiter token was empty or whitespace only
    #[error("{token} cannot be empty")]
    EmptyToken { token: &'static str },

    /// Two tokens share the same text, which makes scanning ambiguous
    #[error("{first} and {second} must differ (both are '{value}')")]
    DuplicateTokens {
        first: &'static str,
        second: &'static str,
        value: String,
    },

    /// An escape given as text that is not exactly one character
    #[error("escape must be a single character, got '{value}'")]
    InvalidEscape { value: String },

    /// A recursion bound that would forbid resolving anything
    #[error("max depth must be at least 1")]
    ZeroDepth,
}

/// An invalid argument passed to a builder-style operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// A key or locale that was empty or whitespace only
    #[error("{name} cannot be empty")]
    Empty { name: &'static str },
}

impl ArgumentError {
    /// Reject `value` if it is blank
    pub(crate) fn require(value: &str, name: &'static str) -> Result<(), Self> {
        if value.trim().is_empty() {
            Err(Self::Empty { name })
        } else {
            Ok(())
        }
    }
}

/// Errors that can occur when loading a message catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid catalog syntax section: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid catalog entry: {0}")]
    Argument(#[from] ArgumentError),
}
