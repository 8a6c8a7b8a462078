//! Error and validity state of a field.

use serde::{Deserialize, Serialize};

/// Outcome of one validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorState {
    pub is_error: bool,
    pub message: Option<String>,
}

impl ErrorState {
    /// A passing outcome: no error, no message.
    pub fn valid() -> Self {
        Self::default()
    }

    /// A failing outcome carrying the failed validator's message.
    pub fn invalid(message: Option<String>) -> Self {
        Self {
            is_error: true,
            message,
        }
    }
}

/// Snapshot of everything that decides whether a field is valid.
///
/// # Example
///
/// ```rust
/// use fieldwise::core::{ErrorState, FieldStatus};
///
/// let untouched = FieldStatus {
///     changed: false,
///     empty_allowed: false,
///     error: ErrorState::valid(),
/// };
/// assert!(!untouched.is_valid());
/// assert!(!untouched.shows_error());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatus {
    /// Whether the field has been through at least one validation pass
    pub changed: bool,
    pub empty_allowed: bool,
    pub error: ErrorState,
}

impl FieldStatus {
    /// Valid iff the field was validated (or may stay empty) and has no error.
    pub fn is_valid(&self) -> bool {
        !self.error.is_error && (self.changed || self.empty_allowed)
    }

    /// Whether a display layer should render the error.
    ///
    /// Untouched fields are not valid yet but have nothing to show.
    pub fn shows_error(&self) -> bool {
        self.changed && self.error.is_error
    }
}
