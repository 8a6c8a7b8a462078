//! Builder API for ergonomic field construction.
//!
//! This module provides a fluent builder and macros for creating fields and
//! value types with minimal boilerplate.

pub mod field;
pub mod macros;

pub use field::FieldBuilder;

use crate::core::{FieldValue, Validator};
use crate::field::Field;

/// Create a field whose value must be present and non-empty.
///
/// # Example
///
/// ```
/// use fieldwise::builder::required_field;
///
/// let name = required_field::<String>("required");
/// name.set("Ada".to_string());
/// name.set(String::new());
/// assert_eq!(name.error().as_deref(), Some("required"));
/// ```
pub fn required_field<V: FieldValue>(message: impl Into<String>) -> Field<V> {
    FieldBuilder::new()
        .validator_with_message(message, Validator::on_value(|value: &V| !value.is_empty()))
        .build()
}

/// Create a field that must repeat `target`'s value, like a password
/// confirmation.
///
/// # Example
///
/// ```
/// use fieldwise::builder::confirmation_field;
/// use fieldwise::Field;
///
/// let password: Field<String> = Field::new();
/// let confirm = confirmation_field("no match", &password);
///
/// password.set("abc".to_string());
/// confirm.set("abd".to_string());
/// assert!(confirm.is_error());
/// ```
pub fn confirmation_field<V: FieldValue>(message: impl Into<String>, target: &Field<V>) -> Field<V> {
    FieldBuilder::new().verify(message, target).build()
}
