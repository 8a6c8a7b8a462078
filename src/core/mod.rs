//! Pure validation core.
//!
//! This module contains the side-effect-free half of the engine:
//! - Value types via the `FieldValue` trait
//! - Validator predicates and ordered rule sets
//! - Error and validity state
//!
//! Nothing here notifies, cascades or reports. The `field` module wraps
//! these pieces with the reactive shell.

mod rules;
mod status;
mod validator;
mod value;

pub use rules::{Rule, RuleSet};
pub use status::{ErrorState, FieldStatus};
pub use validator::{Validator, ValidatorId};
pub use value::FieldValue;

pub(crate) use value::{display_text, same_option};
