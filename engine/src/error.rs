//! Error types for the Formcraft engine.
//!
//! Stale ids are not errors: mutations addressing a node that no longer
//! exists return the state unchanged. Errors only come from loading a
//! persisted schema, from palette actions with nothing to target, and from
//! rejected configuration.

use crate::{NodeId, NodeKind};
use thiserror::Error;

/// All possible errors from the Formcraft engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Load errors
    #[error("malformed schema: {0}")]
    MalformedSchema(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("empty id on {0} node")]
    EmptyId(NodeKind),

    #[error("invalid span {span} on column '{column}': expected 1..=4")]
    InvalidSpan { column: NodeId, span: u8 },

    // Palette errors
    #[error("no target {0} for the current selection")]
    NoTarget(NodeKind),

    // Configuration errors
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedSchema(err.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
