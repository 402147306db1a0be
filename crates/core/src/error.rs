// Copyright 2025 Leadscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Crate-wide error and result types.

use thiserror::Error as ThisError;

/// Errors produced by core domain operations.
///
/// These are programming or configuration errors, not runtime conditions
/// the system tolerates: callers are expected to fail fast on them rather
/// than absorb them into partial results.
#[derive(Debug, ThisError)]
pub enum Error {
    /// An input value violated a documented precondition.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A model variant name outside the closed supported set.
    #[error("Unknown model variant: {0}")]
    UnknownVariant(String),
}

impl Error {
    /// Create an [`Error::InvalidInput`] from any displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = Error::invalid_input("score out of range");
        assert_eq!(err.to_string(), "Invalid input: score out of range");
    }

    #[test]
    fn test_unknown_variant_message() {
        let err = Error::UnknownVariant("grok-9".to_string());
        assert_eq!(err.to_string(), "Unknown model variant: grok-9");
    }
}
