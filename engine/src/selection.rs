//! The single active node used to scope insert and edit actions.

use crate::{Form, NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// Weak reference to a node: kind plus id, resolved against the live tree
/// every time it is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub id: NodeId,
}

impl NodeRef {
    pub fn new(kind: NodeKind, id: impl Into<NodeId>) -> Self {
        Self { kind, id: id.into() }
    }

    pub fn form(id: impl Into<NodeId>) -> Self {
        Self::new(NodeKind::Form, id)
    }

    pub fn section(id: impl Into<NodeId>) -> Self {
        Self::new(NodeKind::Section, id)
    }

    pub fn row(id: impl Into<NodeId>) -> Self {
        Self::new(NodeKind::Row, id)
    }

    pub fn column(id: impl Into<NodeId>) -> Self {
        Self::new(NodeKind::Column, id)
    }

    pub fn field(id: impl Into<NodeId>) -> Self {
        Self::new(NodeKind::Field, id)
    }

    /// Whether the referenced node currently exists in `form`.
    pub fn is_live(&self, form: &Form) -> bool {
        form.contains(self.kind, &self.id)
    }
}

/// The current selection; `None` when nothing is selected.
pub type Selection = Option<NodeRef>;

/// Drop the selection if it no longer points at a node of `form`.
pub fn retain_live(selection: &Selection, form: &Form) -> Selection {
    selection.as_ref().filter(|s| s.is_live(form)).cloned()
}
