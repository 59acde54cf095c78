//! Editing handlers - commands, palette actions and drag ends.

use crate::error::{AppError, Result};
use crate::session::{BuilderView, Session};
use formcraft_engine::{Command, DragItem, FieldType};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Request body for the palette's "add field" button.
#[derive(Debug, Deserialize)]
pub struct PaletteFieldRequest {
    /// Field type name, e.g. `"textarea"`
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Request body for a finished drag.
#[derive(Debug, Deserialize)]
pub struct DragEndRequest {
    pub active: DragItem,
    /// Item the drag ended over, if any
    #[serde(default)]
    pub over: Option<DragItem>,
}

/// Response for a finished drag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEndResponse {
    /// Whether the drop reordered anything
    pub moved: bool,
    #[serde(flatten)]
    pub view: BuilderView,
}

/// Current tree, selection and palette targets.
pub async fn handle_view(session: &Mutex<Session>) -> BuilderView {
    session.lock().await.view()
}

/// Apply one command. Stale ids are no-ops and still return the view.
pub async fn handle_command(session: &Mutex<Session>, command: Command) -> BuilderView {
    let op = command.name();
    let allocates = command.allocates_ids();
    let mut session = session.lock().await;
    let view = session.apply(command);
    tracing::debug!(op, allocates, nodes = view.form.node_count(), "command applied");
    view
}

/// Add a field of the requested type at the current selection.
pub async fn handle_palette_field(
    session: &Mutex<Session>,
    request: PaletteFieldRequest,
) -> Result<BuilderView> {
    let field_type: FieldType = request
        .field_type
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown field type: {}", request.field_type)))?;

    let view = session.lock().await.add_field_at_selection(field_type)?;
    Ok(view)
}

/// Add a row at the current selection.
pub async fn handle_palette_row(session: &Mutex<Session>) -> Result<BuilderView> {
    let view = session.lock().await.add_row_at_selection()?;
    Ok(view)
}

/// Turn a finished drag into a reorder when both ends share a list.
pub async fn handle_drag(session: &Mutex<Session>, request: DragEndRequest) -> DragEndResponse {
    let (moved, view) = session
        .lock()
        .await
        .drag_end(&request.active, request.over.as_ref());
    if !moved {
        tracing::debug!(active = %request.active.id, "drag ended without a move");
    }
    DragEndResponse { moved, view }
}
