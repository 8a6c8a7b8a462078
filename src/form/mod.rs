//! Form aggregation.
//!
//! A field reports every validation pass to its parent form through the
//! [`FormValidation`] trait. The form sees fields only through the
//! type-erased [`ValidatedField`] view, so fields of different value types
//! can share one form.
//!
//! [`ValidatedForm`] is a ready-made aggregator: it combines the validity of
//! all its fields and can report every failing field at once.
//!
//! # Example
//!
//! ```rust
//! use fieldwise::core::Validator;
//! use fieldwise::{Field, ValidatedForm};
//!
//! let form = ValidatedForm::new();
//! let name: Field<String> = Field::new();
//! name.add_custom_validator(Validator::on_value(|s: &String| !s.is_empty()), Some("required"));
//! let age: Field<u32> = Field::new();
//!
//! form.add_field(&name).add_field(&age);
//! assert!(!form.is_valid());
//!
//! name.set("Ada".to_string());
//! age.set(36);
//! assert!(form.is_valid());
//! ```

mod aggregate;
mod failure;

pub use aggregate::{FieldSnapshot, FormEvent, FormSnapshot, ValidatedForm};
pub use failure::FieldFailure;

use crate::core::FieldStatus;
use crate::field::FieldId;
use std::rc::Weak;

/// Receiver of field validation reports.
///
/// Called at the end of every validation pass of a field attached to this
/// form, whether or not the field's state changed.
pub trait FormValidation {
    fn field_validation_changed(&self, field: &dyn ValidatedField);
}

/// Type-erased view of a field, as seen by forms.
pub trait ValidatedField {
    fn id(&self) -> FieldId;

    fn status(&self) -> FieldStatus;

    fn display_value(&self) -> String;

    fn destroy(&self);

    /// Forget the parent form if it is still `form`. A field that has
    /// moved on to another form keeps that link.
    fn detach_form(&self, form: &Weak<dyn FormValidation>);

    /// Whether a validation pass of this field is still in progress.
    ///
    /// Forms hold back their aggregate while any of their fields is mid-pass.
    fn is_validating(&self) -> bool {
        false
    }

    fn is_valid(&self) -> bool {
        self.status().is_valid()
    }

    fn is_error(&self) -> bool {
        self.status().error.is_error
    }

    fn error(&self) -> Option<String> {
        self.status().error.message
    }
}
