//! Save and load handlers.

use crate::db::SchemaStore;
use crate::error::{AppError, Result};
use crate::session::{BuilderView, Session};
use chrono::{DateTime, Utc};
use formcraft_engine::persist;
use serde::Serialize;
use tokio::sync::Mutex;

/// Response for a save.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub storage_key: String,
    pub saved_at: DateTime<Utc>,
}

/// Write the current tree under `key`.
pub async fn handle_save(
    store: &SchemaStore,
    session: &Mutex<Session>,
    key: &str,
) -> Result<SaveResponse> {
    let body = {
        let session = session.lock().await;
        persist::to_value(session.form())
            .map_err(|e| AppError::Internal(format!("could not encode schema: {e}")))?
    };

    let saved_at = store.save(key, &body).await?;
    tracing::info!(key, backend = store.backend(), "schema saved");

    Ok(SaveResponse {
        storage_key: key.to_string(),
        saved_at,
    })
}

/// Replace the session's tree with the document stored under `key`.
///
/// A missing document is a 404; a malformed one is a 422 and the session
/// keeps its current tree.
pub async fn handle_load(
    store: &SchemaStore,
    session: &Mutex<Session>,
    key: &str,
) -> Result<BuilderView> {
    let stored = store
        .load(key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No schema stored under {key}")))?;

    let view = session.lock().await.restore(stored.body)?;
    tracing::info!(
        key,
        updated_at = %stored.updated_at,
        nodes = view.form.node_count(),
        "schema loaded"
    );
    Ok(view)
}
