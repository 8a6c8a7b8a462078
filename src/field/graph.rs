//! Bound-field graph used to cascade re-validation.
//!
//! Edges point from a field to the fields that must be re-validated when its
//! value changes. Edges never own their target: a dropped dependent simply
//! disappears from the graph the next time it is walked.

use super::engine::FieldId;
use std::collections::HashSet;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// A field that can be re-validated by a cascade.
pub(crate) trait Dependent {
    fn id(&self) -> FieldId;

    fn is_changed(&self) -> bool;

    /// Re-run the validation pipeline of this field as part of `cascade`.
    fn revalidate(self: Rc<Self>, cascade: &mut Cascade);
}

/// Fields to notify when the owning field changes.
#[derive(Default)]
pub(crate) struct BoundFields {
    edges: Vec<Weak<dyn Dependent>>,
}

impl BoundFields {
    pub(crate) fn add(&mut self, dependent: Weak<dyn Dependent>) {
        self.edges.push(dependent);
    }

    /// Live dependents in insertion order, pruning dropped ones.
    pub(crate) fn live(&mut self) -> Vec<Rc<dyn Dependent>> {
        self.edges.retain(|weak| weak.strong_count() > 0);
        self.edges.iter().filter_map(Weak::upgrade).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.edges
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

/// One synchronous cascade traversal.
///
/// Records every field whose pipeline ran, so a field is validated at most
/// once per traversal and dependency cycles terminate.
#[derive(Debug, Default)]
pub(crate) struct Cascade {
    visited: HashSet<FieldId>,
}

impl Cascade {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as visited. Returns false if it already was.
    pub(crate) fn enter(&mut self, id: FieldId) -> bool {
        self.visited.insert(id)
    }

    /// Notify the dependents of `source` that have already been validated.
    ///
    /// Dependents that never went through a validation pass are left
    /// untouched, so an untouched confirmation field is not flagged early.
    pub(crate) fn notify(&mut self, source: FieldId, dependents: Vec<Rc<dyn Dependent>>) {
        for dependent in dependents {
            let target = dependent.id();
            if self.visited.contains(&target) {
                debug!(%source, %target, "field already validated in this cascade");
                continue;
            }
            if !dependent.is_changed() {
                trace!(%source, %target, "skipping unchanged dependent");
                continue;
            }
            trace!(%source, %target, "cascading validation");
            dependent.revalidate(self);
        }
    }

    #[cfg(test)]
    pub(crate) fn visited(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Probe {
        id: FieldId,
        changed: bool,
        runs: Cell<usize>,
    }

    impl Probe {
        fn new(changed: bool) -> Rc<Self> {
            Rc::new(Self {
                id: FieldId::generate(),
                changed,
                runs: Cell::new(0),
            })
        }
    }

    impl Dependent for Probe {
        fn id(&self) -> FieldId {
            self.id
        }

        fn is_changed(&self) -> bool {
            self.changed
        }

        fn revalidate(self: Rc<Self>, cascade: &mut Cascade) {
            if cascade.enter(self.id) {
                self.runs.set(self.runs.get() + 1);
            }
        }
    }

    fn as_dependent(probe: &Rc<Probe>) -> Rc<dyn Dependent> {
        Rc::clone(probe) as Rc<dyn Dependent>
    }

    #[test]
    fn cascade_skips_unchanged_dependents() {
        let touched = Probe::new(true);
        let untouched = Probe::new(false);

        let mut cascade = Cascade::new();
        cascade.notify(
            FieldId::generate(),
            vec![as_dependent(&touched), as_dependent(&untouched)],
        );

        assert_eq!(touched.runs.get(), 1);
        assert_eq!(untouched.runs.get(), 0);
    }

    #[test]
    fn cascade_visits_each_field_once() {
        let probe = Probe::new(true);

        let mut cascade = Cascade::new();
        cascade.notify(
            FieldId::generate(),
            vec![as_dependent(&probe), as_dependent(&probe)],
        );

        assert_eq!(probe.runs.get(), 1);
        assert_eq!(cascade.visited(), 1);
    }

    #[test]
    fn cascade_skips_the_source_itself() {
        let probe = Probe::new(true);

        let mut cascade = Cascade::new();
        assert!(cascade.enter(probe.id));
        cascade.notify(probe.id, vec![as_dependent(&probe)]);

        assert_eq!(probe.runs.get(), 0);
    }

    #[test]
    fn bound_fields_drop_dead_edges() {
        let kept = Probe::new(true);
        let dropped = Probe::new(true);

        let mut bound = BoundFields::default();
        let kept_dep = as_dependent(&kept);
        let dropped_dep = as_dependent(&dropped);
        bound.add(Rc::downgrade(&kept_dep));
        bound.add(Rc::downgrade(&dropped_dep));

        drop(dropped_dep);
        drop(dropped);

        assert_eq!(bound.len(), 1);
        assert_eq!(bound.live().len(), 1);
    }
}
