//! Fieldwise: a reactive field validation engine
//!
//! Fieldwise is built on a "pure core, imperative shell" split. Evaluating
//! a value against its rules is a pure function; storing the outcome,
//! cascading to dependent fields and reporting to a form happen in a thin
//! synchronous shell around it.
//!
//! # Core Concepts
//!
//! - **Validator**: pure predicate over a value, evaluated in insertion order
//! - **Field**: value holder that re-validates itself on every change
//! - **Bound fields**: fields re-validated when another field changes
//! - **Form**: collaborator receiving every validation pass of its fields
//!
//! # Example
//!
//! ```rust
//! use fieldwise::{FieldBuilder, ValidatedForm};
//!
//! let form = ValidatedForm::new();
//!
//! let password = FieldBuilder::new()
//!     .require("required", |s: &String| !s.is_empty())
//!     .build();
//! let confirm = FieldBuilder::new()
//!     .require("required", |s: &String| !s.is_empty())
//!     .verify("no match", &password)
//!     .build();
//! form.add_field(&password).add_field(&confirm);
//!
//! password.set("abc".to_string());
//! confirm.set("abc".to_string());
//! assert!(form.is_valid());
//!
//! // The confirmation is re-validated without being touched.
//! password.set("abcd".to_string());
//! assert_eq!(confirm.error().as_deref(), Some("no match"));
//! assert!(!form.is_valid());
//! ```

pub mod builder;
pub mod core;
pub mod display;
mod error;
pub mod field;
pub mod form;
pub mod messages;

// Re-export commonly used types
pub use builder::FieldBuilder;
pub use crate::core::{ErrorState, FieldStatus, FieldValue, Validator};
pub use error::ParseError;
pub use field::{destroy_all, Field, FieldEvent, FieldId, Subscription};
pub use form::{FieldFailure, FormValidation, ValidatedField, ValidatedForm};
pub use messages::MessageSource;
