//! Core error types for `BoostBot`.

use thiserror::Error;

/// Core error type for `BoostBot` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data violating a model invariant.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Unknown strategy name.
    #[error("Unknown fetch strategy: {0}")]
    UnknownStrategy(String),
}
