//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use formcraft_engine::Error as EngineError;
use serde::Serialize;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] formcraft_engine::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    None,
                )
            }
            AppError::Engine(e @ EngineError::NoTarget(_)) => {
                tracing::debug!("Palette action unavailable: {}", e);
                (StatusCode::CONFLICT, e.to_string(), None)
            }
            AppError::Engine(
                e @ (EngineError::MalformedSchema(_)
                | EngineError::DuplicateId(_)
                | EngineError::EmptyId(_)
                | EngineError::InvalidSpan { .. }),
            ) => {
                tracing::warn!("Rejected stored schema: {:?}", e);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Stored schema could not be loaded".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Engine(e) => {
                tracing::error!("Engine error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Engine error".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_engine::NodeKind;

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn load_failures_are_unprocessable() {
        let rejected = [
            EngineError::MalformedSchema("bad".into()),
            EngineError::DuplicateId("row-1".into()),
            EngineError::EmptyId(NodeKind::Field),
            EngineError::InvalidSpan {
                column: "column-1".into(),
                span: 9,
            },
        ];
        for err in rejected {
            assert_eq!(status(err.into()), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn other_engine_errors_are_not_reported_as_load_failures() {
        assert_eq!(
            status(EngineError::NoTarget(NodeKind::Column).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(EngineError::InvalidConfig("spans".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(AppError::Internal("encode".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
