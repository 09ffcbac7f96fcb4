//! Store error types.

use thiserror::Error;

/// Errors raised by configuration loading.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A key is missing or set to an unusable value.
    #[error("Configuration error: {key} {reason}")]
    Config {
        /// The offending key.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl StoreError {
    /// A required key is not set.
    pub fn missing(key: &'static str) -> Self {
        StoreError::Config {
            key,
            reason: "is not set".to_string(),
        }
    }

    /// A key holds a value that cannot be used.
    pub fn invalid(key: &'static str, reason: impl std::fmt::Display) -> Self {
        StoreError::Config {
            key,
            reason: format!("is invalid: {reason}"),
        }
    }

    /// The configuration key the error is about.
    pub fn key(&self) -> &'static str {
        match self {
            StoreError::Config { key, .. } => key,
        }
    }
}
