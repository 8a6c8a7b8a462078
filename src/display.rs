//! Bindings from fields to display sinks.
//!
//! The engine does not render anything. A display layer plugs in through two
//! sinks: one receiving the error message to show, one receiving the value's
//! display text. Text typed by the user goes back through
//! [`Field::set_display_value`].
//!
//! # Invariants
//!
//! 1. A sink receives the current state immediately on binding.
//! 2. The error sink receives every error update, including repeats.
//! 3. Dropping the returned [`Subscription`] disconnects the sink.
//! 4. A display binding never keeps its field alive.

use crate::core::FieldValue;
use crate::field::{Field, FieldEvent, Subscription};

/// Receiver of the error message a field wants shown (`None` clears it).
pub trait ErrorSink {
    fn show_error(&self, message: Option<&str>);
}

impl<F: Fn(Option<&str>)> ErrorSink for F {
    fn show_error(&self, message: Option<&str>) {
        self(message)
    }
}

/// Push `field`'s error message to `sink` now and after every validation
/// pass.
///
/// # Example
///
/// ```rust
/// use fieldwise::display::bind_error;
/// use fieldwise::FieldBuilder;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let shown = Rc::new(RefCell::new(None));
/// let field = FieldBuilder::new()
///     .require("required", |s: &String| !s.is_empty())
///     .build();
///
/// let target = Rc::clone(&shown);
/// let _binding = bind_error(&field, move |msg: Option<&str>| {
///     *target.borrow_mut() = msg.map(str::to_string);
/// });
///
/// field.set("a".to_string());
/// field.set(String::new());
/// assert_eq!(shown.borrow().as_deref(), Some("required"));
/// ```
pub fn bind_error<V: FieldValue>(field: &Field<V>, sink: impl ErrorSink + 'static) -> Subscription {
    sink.show_error(field.error().as_deref());
    field.subscribe(move |event| {
        if let FieldEvent::ErrorChanged { message, .. } = event {
            sink.show_error(message.as_deref());
        }
    })
}

/// Push `field`'s display text to `sink` now and after every value change.
pub fn bind_display<V: FieldValue>(field: &Field<V>, sink: impl Fn(&str) + 'static) -> Subscription {
    sink(&field.display_value());
    let source = field.downgrade();
    field.subscribe(move |event| {
        if *event != FieldEvent::ValueChanged {
            return;
        }
        if let Some(shared) = source.upgrade() {
            sink(&Field::from_shared(shared).display_value());
        }
    })
}
