//! Builder for configuring fields before their first validation.

use crate::core::{FieldValue, Validator};
use crate::field::Field;
use crate::form::FormValidation;
use std::rc::{Rc, Weak};

enum PendingRule<V: FieldValue> {
    Custom(Validator<V>, Option<String>),
    Verify(String, Field<V>),
}

/// Builder for constructing fields with a fluent API.
///
/// Unlike [`Field::with_value`], the initial value is set after every rule
/// is installed, so the first validation pass sees all of them.
///
/// # Example
///
/// ```rust
/// use fieldwise::FieldBuilder;
///
/// let username = FieldBuilder::new()
///     .require("required", |s: &String| !s.is_empty())
///     .require("too long", |s: &String| s.len() <= 8)
///     .initial("ada_lovelace".to_string())
///     .build();
///
/// assert_eq!(username.error().as_deref(), Some("too long"));
/// ```
pub struct FieldBuilder<V: FieldValue> {
    initial: Option<V>,
    empty_allowed: bool,
    rules: Vec<PendingRule<V>>,
    form: Option<Weak<dyn FormValidation>>,
}

impl<V: FieldValue> FieldBuilder<V> {
    pub fn new() -> Self {
        Self {
            initial: None,
            empty_allowed: false,
            rules: Vec::new(),
            form: None,
        }
    }

    /// Set the initial value, validated when the field is built.
    pub fn initial(mut self, value: V) -> Self {
        self.initial = Some(value);
        self
    }

    /// Allow empty values to skip validation.
    pub fn empty_allowed(mut self, allowed: bool) -> Self {
        self.empty_allowed = allowed;
        self
    }

    /// Add a validator without a message.
    pub fn validator(mut self, validator: Validator<V>) -> Self {
        self.rules.push(PendingRule::Custom(validator, None));
        self
    }

    /// Add a validator reporting `message` when it fails.
    pub fn validator_with_message(mut self, message: impl Into<String>, validator: Validator<V>) -> Self {
        self.rules
            .push(PendingRule::Custom(validator, Some(message.into())));
        self
    }

    /// Add a predicate over present values. A missing value fails.
    pub fn require<F>(self, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&V) -> bool + 'static,
    {
        self.validator_with_message(message, Validator::on_value(predicate))
    }

    /// Require the value to equal `target`'s value, re-validating on its
    /// changes.
    pub fn verify(mut self, message: impl Into<String>, target: &Field<V>) -> Self {
        self.rules
            .push(PendingRule::Verify(message.into(), target.clone()));
        self
    }

    /// Report validation passes to `form`.
    ///
    /// This only links the field to the form. A [`ValidatedForm`] also needs
    /// the field registered through `add_field` to count it.
    ///
    /// [`ValidatedForm`]: crate::ValidatedForm
    pub fn form<F: FormValidation + 'static>(mut self, form: &Rc<F>) -> Self {
        let weak = Rc::downgrade(form);
        let form: Weak<dyn FormValidation> = weak;
        self.form = Some(form);
        self
    }

    /// Build the field, then validate the initial value if one was given.
    pub fn build(self) -> Field<V> {
        let field = Field::new();
        field.set_empty_allowed(self.empty_allowed);

        for rule in self.rules {
            match rule {
                PendingRule::Custom(validator, message) => {
                    field.add_custom_validator(validator, message.as_deref());
                }
                PendingRule::Verify(message, target) => {
                    field.add_verify_field_validator(message, &target);
                }
            }
        }

        if let Some(form) = self.form {
            field.attach_form(form);
        }
        if let Some(value) = self.initial {
            field.set(value);
        }
        field
    }
}

impl<V: FieldValue> Default for FieldBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}
