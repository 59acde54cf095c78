//! Builder endpoint routes.

use axum::{extract::State, routing::get, routing::post, Json, Router};

use crate::error::Result;
use crate::handlers::{
    handle_command, handle_drag, handle_load, handle_palette_field, handle_palette_row,
    handle_save, handle_view, DragEndRequest, DragEndResponse, PaletteFieldRequest, SaveResponse,
};
use crate::session::BuilderView;
use crate::AppState;
use formcraft_engine::Command;

/// Create builder routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/builder", get(view_handler))
        .route("/builder/commands", post(command_handler))
        .route("/builder/palette/fields", post(palette_field_handler))
        .route("/builder/palette/rows", post(palette_row_handler))
        .route("/builder/drag", post(drag_handler))
        .route("/builder/save", post(save_handler))
        .route("/builder/load", post(load_handler))
}

/// GET /builder - Current tree, selection and targets.
async fn view_handler(State(state): State<AppState>) -> Json<BuilderView> {
    Json(handle_view(&state.session).await)
}

/// POST /builder/commands - Apply one command.
async fn command_handler(
    State(state): State<AppState>,
    Json(command): Json<Command>,
) -> Json<BuilderView> {
    Json(handle_command(&state.session, command).await)
}

/// POST /builder/palette/fields - Add a field at the selection.
async fn palette_field_handler(
    State(state): State<AppState>,
    Json(request): Json<PaletteFieldRequest>,
) -> Result<Json<BuilderView>> {
    let view = handle_palette_field(&state.session, request).await?;
    Ok(Json(view))
}

/// POST /builder/palette/rows - Add a row at the selection.
async fn palette_row_handler(State(state): State<AppState>) -> Result<Json<BuilderView>> {
    let view = handle_palette_row(&state.session).await?;
    Ok(Json(view))
}

/// POST /builder/drag - Finish a drag.
async fn drag_handler(
    State(state): State<AppState>,
    Json(request): Json<DragEndRequest>,
) -> Json<DragEndResponse> {
    Json(handle_drag(&state.session, request).await)
}

/// POST /builder/save - Persist the current tree.
async fn save_handler(State(state): State<AppState>) -> Result<Json<SaveResponse>> {
    let response = handle_save(&state.store, &state.session, &state.config.storage_key).await?;
    Ok(Json(response))
}

/// POST /builder/load - Restore the stored tree.
async fn load_handler(State(state): State<AppState>) -> Result<Json<BuilderView>> {
    let view = handle_load(&state.store, &state.session, &state.config.storage_key).await?;
    Ok(Json(view))
}
