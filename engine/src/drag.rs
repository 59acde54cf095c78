//! Drag-end handling at the presentation boundary.
//!
//! A drag reports the dragged item and the item it was dropped over, each
//! tagged with the sibling list it belongs to. Only a drop inside the same
//! list becomes a reorder; anything else is dropped here so the reorder
//! resolver never sees two lists.

use crate::{Command, Form, NodeId};
use serde::{Deserialize, Serialize};

/// The sibling list a draggable item lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DragScope {
    #[serde(rename_all = "camelCase")]
    Row { section_id: NodeId },
    #[serde(rename_all = "camelCase")]
    Field { column_id: NodeId },
}

/// One end of a drag: the item and its scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragItem {
    pub id: NodeId,
    pub scope: DragScope,
}

impl DragItem {
    pub fn row(id: impl Into<NodeId>, section_id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            scope: DragScope::Row {
                section_id: section_id.into(),
            },
        }
    }

    pub fn field(id: impl Into<NodeId>, column_id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            scope: DragScope::Field {
                column_id: column_id.into(),
            },
        }
    }
}

/// A same-scope move, ready to hand to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReorderRequest {
    #[serde(rename_all = "camelCase")]
    Rows {
        section_id: NodeId,
        from: usize,
        to: usize,
    },
    #[serde(rename_all = "camelCase")]
    Fields {
        column_id: NodeId,
        from: usize,
        to: usize,
    },
}

impl From<ReorderRequest> for Command {
    fn from(request: ReorderRequest) -> Self {
        match request {
            ReorderRequest::Rows {
                section_id,
                from,
                to,
            } => Command::ReorderRows {
                section_id,
                from_index: from,
                to_index: to,
            },
            ReorderRequest::Fields {
                column_id,
                from,
                to,
            } => Command::ReorderFields {
                column_id,
                from_index: from,
                to_index: to,
            },
        }
    }
}

/// Turn a finished drag into a reorder, or nothing.
///
/// Returns `None` when there is no drop target, when an item is dropped on
/// itself, when the two items are of different kinds or live in different
/// lists, or when either item is no longer in its list.
pub fn resolve_drag_end(
    form: &Form,
    active: &DragItem,
    over: Option<&DragItem>,
) -> Option<ReorderRequest> {
    let over = over?;
    if active.id == over.id {
        return None;
    }

    match (&active.scope, &over.scope) {
        (
            DragScope::Row { section_id },
            DragScope::Row {
                section_id: over_section,
            },
        ) => {
            if section_id != over_section {
                tracing::debug!(%section_id, %over_section, "row dropped into another section, ignoring");
                return None;
            }
            let rows = &form.section(section_id)?.rows;
            let from = rows.iter().position(|r| r.id == active.id)?;
            let to = rows.iter().position(|r| r.id == over.id)?;
            Some(ReorderRequest::Rows {
                section_id: section_id.clone(),
                from,
                to,
            })
        }
        (
            DragScope::Field { column_id },
            DragScope::Field {
                column_id: over_column,
            },
        ) => {
            if column_id != over_column {
                tracing::debug!(%column_id, %over_column, "field dropped into another column, ignoring");
                return None;
            }
            let fields = &form.column(column_id)?.fields;
            let from = fields.iter().position(|f| f.id == active.id)?;
            let to = fields.iter().position(|f| f.id == over.id)?;
            Some(ReorderRequest::Fields {
                column_id: column_id.clone(),
                from,
                to,
            })
        }
        _ => None,
    }
}
