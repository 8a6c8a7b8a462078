//! The reactive shell around the pure core.
//!
//! A [`Field`] stores a value and re-runs the validation pipeline on every
//! change:
//! 1. already-validated bound fields are re-validated (cascade)
//! 2. the value is evaluated against the field's rules
//! 3. the error state is stored and observers are notified
//! 4. the parent form, if any, is told about the pass
//!
//! Everything runs synchronously on the caller's thread. Fields, bound
//! fields and forms only hold weak references to each other.

mod engine;
pub(crate) mod event;
mod graph;

pub use engine::{destroy_all, Field, FieldId};
pub use event::{FieldEvent, Subscription};
