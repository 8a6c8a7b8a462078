//! A form that aggregates the validity of its fields.

use super::failure::FieldFailure;
use super::{FormValidation, ValidatedField};
use crate::core::{FieldStatus, FieldValue};
use crate::field::event::Observers;
use crate::field::{Field, FieldId, Subscription};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, trace};

/// Notification emitted by a form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormEvent {
    /// A field finished a validation pass
    FieldReported { field: FieldId },

    /// The aggregate validity flipped
    ValidityChanged { is_valid: bool },
}

/// Serializable view of one field of a form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub id: FieldId,
    pub display_value: String,
    pub status: FieldStatus,
}

/// Serializable view of a whole form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub is_valid: bool,
    pub fields: Vec<FieldSnapshot>,
}

struct FormState {
    fields: Vec<Box<dyn ValidatedField>>,
    is_valid: bool,
    observers: Observers<FormEvent>,
}

/// Form that is valid when every registered field is valid.
///
/// The form keeps its fields alive; fields only keep a weak reference back.
/// Dropping the form therefore never destroys a field.
pub struct ValidatedForm {
    this: Weak<ValidatedForm>,
    state: RefCell<FormState>,
}

impl ValidatedForm {
    /// Create an empty form. An empty form is valid.
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            state: RefCell::new(FormState {
                fields: Vec::new(),
                is_valid: true,
                observers: Observers::default(),
            }),
        })
    }

    /// Register a field and attach it to this form.
    ///
    /// Registering a field twice keeps a single entry.
    pub fn add_field<V: FieldValue>(&self, field: &Field<V>) -> &Self {
        field.attach_form(self.as_form());
        {
            let mut state = self.state.borrow_mut();
            if state.fields.iter().any(|known| known.id() == field.id()) {
                trace!(field = %field.id(), "field already in form");
                return self;
            }
            state.fields.push(Box::new(field.clone()));
        }
        debug!(field = %field.id(), "field added to form");
        self.refresh();
        self
    }

    /// Unregister a field and detach it from this form.
    ///
    /// Returns false if the field was not part of the form.
    pub fn remove_field(&self, id: FieldId) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            let position = state.fields.iter().position(|field| field.id() == id);
            position.map(|index| state.fields.remove(index))
        };
        let Some(field) = removed else {
            return false;
        };
        field.detach_form(&self.as_form());
        self.refresh();
        true
    }

    pub fn is_valid(&self) -> bool {
        self.state.borrow().is_valid
    }

    pub fn len(&self) -> usize {
        self.state.borrow().fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().fields.is_empty()
    }

    /// Observe form events until the subscription is dropped.
    pub fn subscribe(&self, callback: impl Fn(&FormEvent) + 'static) -> Subscription {
        self.state.borrow_mut().observers.subscribe(callback)
    }

    /// Check every field, accumulating ALL failures.
    ///
    /// Unlike a field's own pipeline this does not stop at the first
    /// problem: every invalid or untouched field is reported.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<FieldFailure>> {
        let state = self.state.borrow();
        let checks: Vec<Validation<(), NonEmptyVec<FieldFailure>>> = state
            .fields
            .iter()
            .map(|field| check_field(field.as_ref()))
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.state.borrow();
        FormSnapshot {
            is_valid: state.is_valid,
            fields: state
                .fields
                .iter()
                .map(|field| FieldSnapshot {
                    id: field.id(),
                    display_value: field.display_value(),
                    status: field.status(),
                })
                .collect(),
        }
    }

    /// Detach every field and forget it. The fields themselves stay usable.
    pub fn destroy(&self) {
        let fields = std::mem::take(&mut self.state.borrow_mut().fields);
        let this = self.as_form();
        for field in &fields {
            field.detach_form(&this);
        }
        debug!(count = fields.len(), "form destroyed");
        self.refresh();
    }

    fn as_form(&self) -> Weak<dyn FormValidation> {
        let this: Weak<ValidatedForm> = self.this.clone();
        this
    }

    /// Recompute the aggregate validity and notify on a flip.
    ///
    /// Held back while a field is mid-pass: its cascade reports dependents
    /// before its own outcome is stored, and the pass ends with a report of
    /// its own.
    fn refresh(&self) {
        let (flipped, observers) = {
            let mut state = self.state.borrow_mut();
            if let Some(pending) = state.fields.iter().find(|field| field.is_validating()) {
                trace!(field = %pending.id(), "field mid-pass, validity not recomputed");
                return;
            }
            let is_valid = state.fields.iter().all(|field| field.is_valid());
            let flipped = is_valid != state.is_valid;
            state.is_valid = is_valid;
            (flipped, state.observers.live())
        };

        if flipped {
            let is_valid = self.is_valid();
            debug!(is_valid, "form validity changed");
            let event = FormEvent::ValidityChanged { is_valid };
            for observer in &observers {
                observer(&event);
            }
        }
    }

    fn emit(&self, event: FormEvent) {
        let observers = self.state.borrow_mut().observers.live();
        for observer in observers {
            observer(&event);
        }
    }
}

impl FormValidation for ValidatedForm {
    fn field_validation_changed(&self, field: &dyn ValidatedField) {
        self.emit(FormEvent::FieldReported { field: field.id() });
        self.refresh();
    }
}

fn check_field(field: &dyn ValidatedField) -> Validation<(), NonEmptyVec<FieldFailure>> {
    let status = field.status();
    if status.is_valid() {
        Validation::success(())
    } else if status.error.is_error {
        Validation::fail(FieldFailure::Invalid {
            field: field.id(),
            message: status.error.message,
        })
    } else {
        Validation::fail(FieldFailure::Untouched { field: field.id() })
    }
}
