//! Field events and the observer lists that deliver them.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::rc::{Rc, Weak};

/// Notification emitted by a field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldEvent {
    /// The stored value changed
    ValueChanged,

    /// A validation pass set the error state (emitted even when unchanged)
    ErrorChanged {
        is_error: bool,
        message: Option<String>,
    },

    /// Emitted with every error update, carrying the derived validity
    ValidChanged { is_valid: bool },
}

/// RAII guard returned by `subscribe`. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Box<dyn Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Observers held weakly; dead entries are pruned during notification.
pub(crate) struct Observers<E> {
    callbacks: Vec<Weak<dyn Fn(&E)>>,
}

impl<E: 'static> Observers<E> {
    pub(crate) fn subscribe(&mut self, callback: impl Fn(&E) + 'static) -> Subscription {
        let callback: Rc<dyn Fn(&E)> = Rc::new(callback);
        self.callbacks.push(Rc::downgrade(&callback));
        Subscription {
            _callback: Box::new(callback),
        }
    }

    /// Live callbacks in registration order. Collected before dispatch so
    /// the owner is not borrowed while observers run.
    pub(crate) fn live(&mut self) -> Vec<Rc<dyn Fn(&E)>> {
        self.callbacks.retain(|weak| weak.strong_count() > 0);
        self.callbacks.iter().filter_map(Weak::upgrade).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }
}
