//! Per-field failures reported by form validation.

use crate::field::FieldId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a field keeps its form from being valid
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldFailure {
    #[error("Field {field} is invalid: {}", .message.as_deref().unwrap_or("no message"))]
    Invalid {
        field: FieldId,
        message: Option<String>,
    },

    #[error("Field {field} has not been validated yet")]
    Untouched { field: FieldId },
}

impl FieldFailure {
    pub fn field(&self) -> FieldId {
        match self {
            Self::Invalid { field, .. } | Self::Untouched { field } => *field,
        }
    }
}
