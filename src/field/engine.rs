//! The validated field and its reactive pipeline.

use super::event::{FieldEvent, Observers, Subscription};
use super::graph::{BoundFields, Cascade, Dependent};
use crate::core::{display_text, same_option, ErrorState, FieldStatus, FieldValue, RuleSet, Validator};
use crate::error::ParseError;
use crate::form::{FormValidation, ValidatedField};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};
use uuid::Uuid;

/// Identity of a field, stable for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldId(Uuid);

impl FieldId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct FieldState<V: FieldValue> {
    value: Option<V>,
    rules: RuleSet<V>,
    empty_allowed: bool,
    changed: bool,
    error: ErrorState,
    bound: BoundFields,
    form: Option<Weak<dyn FormValidation>>,
    observers: Observers<FieldEvent>,
    // false once destroyed: the pipeline no longer listens to changes
    attached: bool,
    // true from the start of a pass until its outcome is stored
    validating: bool,
}

impl<V: FieldValue> FieldState<V> {
    fn status(&self) -> FieldStatus {
        FieldStatus {
            changed: self.changed,
            empty_allowed: self.empty_allowed,
            error: self.error.clone(),
        }
    }
}

pub(crate) struct FieldShared<V: FieldValue> {
    id: FieldId,
    state: RefCell<FieldState<V>>,
}

impl<V: FieldValue> FieldShared<V> {
    pub(crate) fn with_value<R>(&self, f: impl FnOnce(Option<&V>) -> R) -> R {
        f(self.state.borrow().value.as_ref())
    }
}

impl<V: FieldValue> Dependent for FieldShared<V> {
    fn id(&self) -> FieldId {
        self.id
    }

    fn is_changed(&self) -> bool {
        self.state.borrow().changed
    }

    fn revalidate(self: Rc<Self>, cascade: &mut Cascade) {
        Field { shared: self }.run_pipeline(cascade);
    }
}

/// A value holder that validates itself on every change.
///
/// `Field` is a cheap handle: clones share the same underlying field. All
/// operations are synchronous; `set` returns only after the field, every
/// bound dependent and the parent form have been updated.
///
/// # Example
///
/// ```rust
/// use fieldwise::core::Validator;
/// use fieldwise::Field;
///
/// let password: Field<String> = Field::new();
/// password.add_custom_validator(
///     Validator::on_value(|s: &String| s.len() >= 3),
///     Some("too short"),
/// );
///
/// let confirm: Field<String> = Field::new();
/// confirm.add_verify_field_validator("no match", &password);
///
/// password.set("abc".to_string());
/// confirm.set("abd".to_string());
/// assert_eq!(confirm.error().as_deref(), Some("no match"));
///
/// // Changing the password re-validates the confirmation.
/// password.set("abd".to_string());
/// assert!(confirm.is_valid());
/// ```
pub struct Field<V: FieldValue> {
    shared: Rc<FieldShared<V>>,
}

impl<V: FieldValue> Field<V> {
    /// Create an empty field. No validation runs until the first change.
    pub fn new() -> Self {
        Self {
            shared: Rc::new(FieldShared {
                id: FieldId::generate(),
                state: RefCell::new(FieldState {
                    value: None,
                    rules: RuleSet::new(),
                    empty_allowed: false,
                    changed: false,
                    error: ErrorState::valid(),
                    bound: BoundFields::default(),
                    form: None,
                    observers: Observers::default(),
                    attached: true,
                    validating: false,
                }),
            }),
        }
    }

    /// Create a field holding `value`, validated immediately.
    ///
    /// No validators exist yet at that point, so the field starts valid.
    /// Use [`FieldBuilder`](crate::FieldBuilder) to validate the initial value
    /// against rules.
    pub fn with_value(value: V) -> Self {
        let field = Self::new();
        field.set(value);
        field
    }

    pub fn id(&self) -> FieldId {
        self.shared.id
    }

    /// Current value (cloned).
    pub fn get(&self) -> Option<V> {
        self.shared.state.borrow().value.clone()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(Option<&V>) -> R) -> R {
        self.shared.with_value(f)
    }

    /// Store a new value and run the validation pipeline.
    ///
    /// Setting a value equal to the current one does nothing: no events, no
    /// validation, no cascade. Otherwise the pipeline runs first and
    /// observers receive `ValueChanged` afterwards.
    pub fn set(&self, value: impl Into<Option<V>>) {
        let value = value.into();
        let attached = {
            let mut state = self.shared.state.borrow_mut();
            if same_option(state.value.as_ref(), value.as_ref()) {
                return;
            }
            state.value = value;
            state.attached
        };
        debug!(field = %self.id(), "value changed");

        if attached {
            self.run_pipeline(&mut Cascade::new());
        }
        self.emit(FieldEvent::ValueChanged);
    }

    /// Remove the value.
    pub fn clear(&self) {
        self.set(None);
    }

    /// Display text for the current value, recomputed on every call.
    pub fn display_value(&self) -> String {
        self.with(display_text::<V>)
    }

    /// Set the value from display text.
    ///
    /// The text is parsed by the value type; on failure the field is left
    /// untouched.
    pub fn set_display_value(&self, text: &str) -> Result<(), ParseError> {
        let value = V::parse_display(text)?;
        self.set(value);
        Ok(())
    }

    /// Allow empty values to pass without running validators.
    ///
    /// Takes effect on the next validation pass.
    pub fn set_empty_allowed(&self, allowed: bool) -> &Self {
        self.shared.state.borrow_mut().empty_allowed = allowed;
        self
    }

    pub fn is_empty_allowed(&self) -> bool {
        self.shared.state.borrow().empty_allowed
    }

    /// Append a validator. Registering the same validator again only
    /// replaces its message.
    pub fn add_custom_validator(&self, validator: Validator<V>, message: Option<&str>) -> &Self {
        self.shared
            .state
            .borrow_mut()
            .rules
            .insert(validator, message.map(str::to_string));
        self
    }

    /// Require this field's value to equal `target`'s value.
    ///
    /// Also binds this field to `target`: whenever `target` changes, this
    /// field is re-validated, provided it has been validated before.
    pub fn add_verify_field_validator(&self, message: impl Into<String>, target: &Field<V>) -> &Self {
        let message = message.into();
        let target_ref = Rc::downgrade(&target.shared);
        let validator = Validator::new(move |value: Option<&V>| match target_ref.upgrade() {
            Some(target) => target.with_value(|current| same_option(current, value)),
            None => value.is_none(),
        });
        self.add_custom_validator(validator, Some(message.as_str()));

        let weak = Rc::downgrade(&self.shared);
        let dependent: Weak<dyn Dependent> = weak;
        target.shared.state.borrow_mut().bound.add(dependent);
        debug!(field = %self.id(), target = %target.id(), "bound to field");
        self
    }

    /// Report every validation pass of this field to `form`.
    ///
    /// The field keeps only a weak reference; dropping the form detaches it.
    pub fn set_form_validation<F: FormValidation + 'static>(&self, form: &Rc<F>) {
        let weak = Rc::downgrade(form);
        let form: Weak<dyn FormValidation> = weak;
        self.attach_form(form);
    }

    pub fn clear_form_validation(&self) {
        self.shared.state.borrow_mut().form = None;
    }

    pub(crate) fn attach_form(&self, form: Weak<dyn FormValidation>) {
        self.shared.state.borrow_mut().form = Some(form);
    }

    /// Whether a validation pass of this field is in progress.
    ///
    /// True while the cascade of the pass runs, false again once the outcome
    /// is stored and before the form is told about it.
    pub fn is_validating(&self) -> bool {
        self.shared.state.borrow().validating
    }

    /// Whether the last validation pass failed.
    ///
    /// False before the first pass, even when the value would fail.
    pub fn is_error(&self) -> bool {
        self.shared.state.borrow().error.is_error
    }

    pub fn error(&self) -> Option<String> {
        self.shared.state.borrow().error.message.clone()
    }

    /// Validated (or allowed to stay empty) and free of errors.
    pub fn is_valid(&self) -> bool {
        self.status().is_valid()
    }

    pub fn is_changed(&self) -> bool {
        self.shared.state.borrow().changed
    }

    pub fn status(&self) -> FieldStatus {
        self.shared.state.borrow().status()
    }

    pub fn validator_count(&self) -> usize {
        self.shared.state.borrow().rules.len()
    }

    /// Number of live fields re-validated when this one changes.
    pub fn bound_field_count(&self) -> usize {
        self.shared.state.borrow().bound.len()
    }

    /// Observe events of this field until the subscription is dropped.
    pub fn subscribe(&self, callback: impl Fn(&FieldEvent) + 'static) -> Subscription {
        self.shared.state.borrow_mut().observers.subscribe(callback)
    }

    pub fn observer_count(&self) -> usize {
        self.shared.state.borrow().observers.len()
    }

    /// Detach the validation pipeline, drop all validators and forget the
    /// parent form. Safe to call more than once.
    ///
    /// Afterwards value changes and cascades no longer validate this field,
    /// and it never reports to a form again.
    pub fn destroy(&self) {
        let mut state = self.shared.state.borrow_mut();
        if state.attached {
            debug!(field = %self.shared.id, "field destroyed");
        }
        state.attached = false;
        state.rules.clear();
        state.form = None;
    }

    pub fn is_destroyed(&self) -> bool {
        !self.shared.state.borrow().attached
    }

    pub(crate) fn downgrade(&self) -> Weak<FieldShared<V>> {
        Rc::downgrade(&self.shared)
    }

    pub(crate) fn from_shared(shared: Rc<FieldShared<V>>) -> Self {
        Self { shared }
    }

    fn run_pipeline(&self, cascade: &mut Cascade) {
        if !cascade.enter(self.id()) {
            return;
        }

        let dependents = {
            let mut state = self.shared.state.borrow_mut();
            if !state.attached {
                trace!(field = %self.id(), "destroyed field ignores validation");
                return;
            }
            state.validating = true;
            state.bound.live()
        };
        cascade.notify(self.id(), dependents);

        let (value, rules, empty_allowed) = {
            let state = self.shared.state.borrow();
            (state.value.clone(), state.rules.clone(), state.empty_allowed)
        };
        let outcome = rules.evaluate(value.as_ref(), empty_allowed);
        self.set_error_state(outcome);
    }

    fn set_error_state(&self, outcome: ErrorState) {
        let (form, is_valid) = {
            let mut state = self.shared.state.borrow_mut();
            state.changed = true;
            state.validating = false;
            state.error = outcome.clone();
            (
                state.form.as_ref().and_then(Weak::upgrade),
                state.status().is_valid(),
            )
        };
        trace!(
            field = %self.id(),
            is_error = outcome.is_error,
            message = ?outcome.message,
            "validation pass"
        );

        self.emit(FieldEvent::ErrorChanged {
            is_error: outcome.is_error,
            message: outcome.message,
        });
        self.emit(FieldEvent::ValidChanged { is_valid });

        if let Some(form) = form {
            form.field_validation_changed(self);
        }
    }

    fn emit(&self, event: FieldEvent) {
        let callbacks = self.shared.state.borrow_mut().observers.live();
        for callback in callbacks {
            callback(&event);
        }
    }
}

impl<V: FieldValue> Clone for Field<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<V: FieldValue> Default for Field<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: FieldValue> fmt::Debug for Field<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("Field")
            .field("id", &self.shared.id)
            .field("value", &state.value)
            .field("status", &state.status())
            .finish()
    }
}

impl<V: FieldValue> ValidatedField for Field<V> {
    fn id(&self) -> FieldId {
        Field::id(self)
    }

    fn status(&self) -> FieldStatus {
        Field::status(self)
    }

    fn display_value(&self) -> String {
        Field::display_value(self)
    }

    fn destroy(&self) {
        Field::destroy(self);
    }

    fn detach_form(&self, form: &Weak<dyn FormValidation>) {
        let mut state = self.shared.state.borrow_mut();
        if state
            .form
            .as_ref()
            .is_some_and(|current| Weak::ptr_eq(current, form))
        {
            state.form = None;
        }
    }

    fn is_validating(&self) -> bool {
        Field::is_validating(self)
    }
}

/// Destroy every field in `fields`.
pub fn destroy_all(fields: &[&dyn ValidatedField]) {
    for field in fields {
        field.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct RecordingForm {
        reports: RefCell<Vec<(FieldId, bool)>>,
    }

    impl FormValidation for RecordingForm {
        fn field_validation_changed(&self, field: &dyn ValidatedField) {
            self.reports
                .borrow_mut()
                .push((field.id(), field.status().is_valid()));
        }
    }

    fn non_empty() -> Validator<String> {
        Validator::on_value(|s: &String| !s.is_empty())
    }

    #[test]
    fn new_field_is_untouched() {
        let field: Field<String> = Field::new();

        assert_eq!(field.get(), None);
        assert!(!field.is_changed());
        assert!(!field.is_error());
        assert!(!field.is_valid());
    }

    #[test]
    fn with_value_runs_first_validation() {
        let field = Field::with_value(5i32);

        assert_eq!(field.get(), Some(5));
        assert!(field.is_changed());
        assert!(field.is_valid());
    }

    #[test]
    fn setting_equal_value_is_a_no_op() {
        let field = Field::with_value("abc".to_string());
        let events = Rc::new(Cell::new(0));
        let counter = Rc::clone(&events);
        let _sub = field.subscribe(move |_| counter.set(counter.get() + 1));

        field.set("abc".to_string());

        assert_eq!(events.get(), 0);
    }

    #[test]
    fn setting_none_on_empty_field_is_a_no_op() {
        let field: Field<String> = Field::new();
        field.clear();

        assert!(!field.is_changed());
    }

    #[test]
    fn vacuous_validator_set_makes_field_valid() {
        let field: Field<i64> = Field::new();
        field.set(10);

        assert!(!field.is_error());
        assert!(field.is_valid());
    }

    #[test]
    fn first_failing_validator_sets_message() {
        let field: Field<String> = Field::new();
        field
            .add_custom_validator(Validator::on_value(|_: &String| false), Some("A"))
            .add_custom_validator(Validator::on_value(|_: &String| false), Some("B"));

        field.set("x".to_string());

        assert!(field.is_error());
        assert_eq!(field.error().as_deref(), Some("A"));
    }

    #[test]
    fn empty_allowed_ignores_failing_validators() {
        let field: Field<String> = Field::new();
        field
            .set_empty_allowed(true)
            .add_custom_validator(Validator::on_value(|_: &String| false), Some("never"));

        field.set("x".to_string());
        assert!(field.is_error());

        field.set(String::new());
        assert!(!field.is_error());
        assert_eq!(field.error(), None);
        assert!(field.is_valid());
    }

    #[test]
    fn empty_allowed_field_is_valid_before_any_change() {
        let field: Field<String> = Field::new();
        field.set_empty_allowed(true);

        assert!(field.is_valid());
        assert!(!field.is_changed());
    }

    #[test]
    fn set_empty_allowed_does_not_revalidate() {
        let field: Field<String> = Field::new();
        field.add_custom_validator(non_empty(), Some("required"));
        field.set("a".to_string());
        field.set(String::new());
        assert!(field.is_error());

        field.set_empty_allowed(true);
        assert!(field.is_error());
    }

    #[test]
    fn changed_flag_is_monotonic() {
        let field: Field<String> = Field::new();
        field.add_custom_validator(non_empty(), Some("required"));

        field.set("a".to_string());
        field.set(String::new());
        field.set("b".to_string());

        assert!(field.is_changed());
        assert!(field.is_valid());
    }

    #[test]
    fn verify_validator_binds_fields() {
        let password: Field<String> = Field::new();
        let confirm: Field<String> = Field::new();
        confirm.add_verify_field_validator("mismatch", &password);

        assert_eq!(password.bound_field_count(), 1);
        assert_eq!(confirm.validator_count(), 1);
    }

    #[test]
    fn cascade_revalidates_bound_field() {
        let a: Field<String> = Field::new();
        let b: Field<String> = Field::new();
        b.add_verify_field_validator("mismatch", &a);

        a.set("x".to_string());
        b.set("y".to_string());
        assert!(b.is_error());
        assert_eq!(b.error().as_deref(), Some("mismatch"));

        a.set("y".to_string());
        assert!(!b.is_error());
        assert!(b.is_valid());
    }

    #[test]
    fn cascade_leaves_untouched_dependent_alone() {
        let a: Field<String> = Field::new();
        let b: Field<String> = Field::new();
        b.add_verify_field_validator("mismatch", &a);

        a.set("x".to_string());

        assert!(!b.is_changed());
        assert!(!b.is_error());
    }

    #[test]
    fn mutual_verification_terminates() {
        let a: Field<String> = Field::new();
        let b: Field<String> = Field::new();
        a.add_verify_field_validator("differs from b", &b);
        b.add_verify_field_validator("differs from a", &a);

        a.set("x".to_string());
        b.set("x".to_string());
        assert!(b.is_valid());

        a.set("z".to_string());
        assert!(a.is_error());
        assert!(b.is_error());
    }

    #[test]
    fn self_verification_does_not_recurse() {
        let a: Field<i32> = Field::new();
        a.add_verify_field_validator("impossible", &a);

        a.set(1);

        assert!(a.is_valid());
    }

    #[test]
    fn dropped_target_compares_against_missing_value() {
        let b: Field<String> = Field::new();
        {
            let a: Field<String> = Field::new();
            b.add_verify_field_validator("mismatch", &a);
        }

        b.set("x".to_string());
        assert!(b.is_error());
    }

    #[test]
    fn every_pass_reports_to_form() {
        let form = Rc::new(RecordingForm::default());
        let field: Field<String> = Field::new();
        field.set_form_validation(&form);

        field.set("a".to_string());
        field.set("b".to_string());

        let reports = form.reports.borrow();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|(id, valid)| *id == field.id() && *valid));
    }

    #[test]
    fn cascade_reports_dependent_to_its_form() {
        let form = Rc::new(RecordingForm::default());
        let a: Field<String> = Field::new();
        let b: Field<String> = Field::new();
        b.add_verify_field_validator("mismatch", &a);
        b.set_form_validation(&form);

        b.set("x".to_string());
        a.set("y".to_string());

        let reports = form.reports.borrow();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1], (b.id(), false));
    }

    #[test]
    fn cleared_form_is_not_reported() {
        let form = Rc::new(RecordingForm::default());
        let field: Field<i32> = Field::new();
        field.set_form_validation(&form);
        field.clear_form_validation();

        field.set(1);

        assert!(form.reports.borrow().is_empty());
    }

    #[test]
    fn dropped_form_is_not_reported() {
        let field: Field<i32> = Field::new();
        {
            let form = Rc::new(RecordingForm::default());
            field.set_form_validation(&form);
        }

        field.set(1);
        assert!(field.is_valid());
    }

    #[test]
    fn events_follow_pipeline_order() {
        let field: Field<i32> = Field::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _sub = field.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        field.set(3);

        assert_eq!(
            *log.borrow(),
            vec![
                FieldEvent::ErrorChanged {
                    is_error: false,
                    message: None
                },
                FieldEvent::ValidChanged { is_valid: true },
                FieldEvent::ValueChanged,
            ]
        );
    }

    #[test]
    fn display_value_round_trips_through_parse() {
        let field: Field<u32> = Field::new();

        field.set_display_value("42").unwrap();
        assert_eq!(field.get(), Some(42));
        assert_eq!(field.display_value(), "42");

        field.set_display_value("").unwrap();
        assert_eq!(field.get(), None);
        assert_eq!(field.display_value(), "");
    }

    #[test]
    fn unparsable_display_value_leaves_field_untouched() {
        let field = Field::with_value(7u32);

        assert!(field.set_display_value("seven").is_err());
        assert_eq!(field.get(), Some(7));
    }

    #[test]
    fn destroy_detaches_pipeline_and_form() {
        let form = Rc::new(RecordingForm::default());
        let field: Field<String> = Field::new();
        field
            .add_custom_validator(non_empty(), Some("required"))
            .set_form_validation(&form);

        field.destroy();
        field.destroy();
        field.set("x".to_string());

        assert!(field.is_destroyed());
        assert_eq!(field.validator_count(), 0);
        assert!(!field.is_changed());
        assert!(form.reports.borrow().is_empty());
    }

    #[test]
    fn cascade_into_destroyed_field_is_harmless() {
        let form = Rc::new(RecordingForm::default());
        let a: Field<String> = Field::new();
        let b: Field<String> = Field::new();
        b.add_verify_field_validator("mismatch", &a);
        b.set("x".to_string());
        b.set_form_validation(&form);

        b.destroy();
        a.set("y".to_string());

        assert!(form.reports.borrow().is_empty());
        assert!(b.is_error());
    }

    #[test]
    fn destroy_all_destroys_every_field() {
        let a: Field<String> = Field::new();
        let b: Field<i32> = Field::new();

        destroy_all(&[&a, &b]);

        assert!(a.is_destroyed());
        assert!(b.is_destroyed());
    }

    #[test]
    fn resetting_nan_is_a_no_op() {
        let field: Field<f64> = Field::new();
        field.set(f64::NAN);

        let events = Rc::new(Cell::new(0));
        let counter = Rc::clone(&events);
        let _sub = field.subscribe(move |_| counter.set(counter.get() + 1));

        field.set(f64::NAN);

        assert_eq!(events.get(), 0);
    }

    #[test]
    fn verify_treats_nan_as_matching() {
        let a: Field<f64> = Field::new();
        let b: Field<f64> = Field::new();
        b.add_verify_field_validator("mismatch", &a);

        a.set(f64::NAN);
        b.set(f64::NAN);

        assert!(b.is_valid());
    }

    #[test]
    fn source_is_mid_pass_while_its_cascade_runs() {
        let a: Field<String> = Field::new();
        let b: Field<String> = Field::new();
        b.add_verify_field_validator("mismatch", &a);
        b.set("x".to_string());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let source = a.clone();
        let _sub = b.subscribe(move |event| {
            if let FieldEvent::ErrorChanged { .. } = event {
                sink.borrow_mut().push(source.is_validating());
            }
        });

        a.set("x".to_string());

        assert_eq!(*seen.borrow(), vec![true]);
        assert!(!a.is_validating());
        assert!(!b.is_validating());
    }
}
