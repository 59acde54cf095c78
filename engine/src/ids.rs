//! Identifier generation for new tree nodes.

use crate::{Form, NodeId, NodeKind};

/// Source of fresh node ids.
///
/// This is the only state the engine carries from one call to the next.
/// Implementations must never hand out the same id twice.
pub trait IdGenerator {
    /// Allocate a fresh id for a node of the given kind.
    fn next_id(&mut self, kind: NodeKind) -> NodeId;

    /// Called when a tree built elsewhere is adopted, so later ids do not
    /// collide with the ids it already holds.
    fn observe(&mut self, _form: &Form) {}
}

/// Largest loaded suffix the counter will jump to. Ids with larger suffixes
/// were not issued by this generator and are left out of the count, so the
/// counter always keeps room to grow.
const MAX_OBSERVED: u64 = u64::MAX / 2;

/// Deterministic ids of the form `<kind>-<n>`, one counter for all kinds.
///
/// Should the counter ever run out, ids continue as `<kind>-<n>-<k>` with a
/// second counter rather than wrapping around.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialIds {
    counter: u64,
    spill: u64,
}

impl SequentialIds {
    /// Start counting from zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last value handed out.
    pub fn counter(&self) -> u64 {
        self.counter
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, kind: NodeKind) -> NodeId {
        match self.counter.checked_add(1) {
            Some(next) => {
                self.counter = next;
                format!("{}-{}", kind, next)
            }
            None => {
                self.spill += 1;
                format!("{}-{}-{}", kind, self.counter, self.spill)
            }
        }
    }

    fn observe(&mut self, form: &Form) {
        let highest = form
            .node_ids()
            .filter_map(|id| id.rsplit('-').next()?.parse::<u64>().ok())
            .filter(|n| *n <= MAX_OBSERVED)
            .max()
            .unwrap_or(0);
        self.counter = self.counter.max(highest);
    }
}
