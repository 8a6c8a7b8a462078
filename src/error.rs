//! Errors raised outside the validation pipeline.

use thiserror::Error;

/// Errors that can occur when converting display text into a field value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("Cannot parse '{input}' as {target}: {reason}")]
    Invalid {
        input: String,
        target: &'static str,
        reason: String,
    },
}
