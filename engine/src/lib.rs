//! # Formcraft Engine
//!
//! The schema state engine behind the Formcraft form builder.
//!
//! A form is a strictly typed tree: a [`Form`] holds [`Section`]s, which
//! hold [`Row`]s, which hold [`Column`]s, which hold [`Field`]s. The engine
//! inserts, removes and reorders nodes while keeping that tree valid, tracks
//! a single selected node, and works out where palette actions should
//! insert when no parent is given.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of files, network or rendering
//! - **Snapshots in, snapshots out**: every operation takes a
//!   [`BuilderState`] and returns a new one; there is no ambient state
//! - **Structural sharing**: untouched subtrees keep their `Arc` across
//!   operations, so `Arc::ptr_eq` detects change
//! - **Stale ids are harmless**: operations on ids that no longer exist are
//!   no-ops, never errors
//!
//! ## Core Concepts
//!
//! ### Operations
//!
//! The public operations live in [`mutation`] and on [`Engine`], and are
//! also expressible as data through [`Command`].
//!
//! ### Selection and targets
//!
//! The selection is a weak [`NodeRef`] (kind + id). [`resolve_targets`]
//! maps it to the section that would receive a new row and the column that
//! would receive a new field.
//!
//! ### Reordering
//!
//! [`reorder`] moves one element within one sibling list.
//! [`resolve_drag_end`] turns a drag into a reorder only when both ends sit
//! in the same list.
//!
//! ## Quick Start
//!
//! ```rust
//! use formcraft_engine::{Engine, FieldType, NodeRef, resolve_targets};
//!
//! let mut engine = Engine::default();
//! let state = engine.new_state();
//!
//! let state = engine.add_section(&state, "Contact");
//! let section_id = state.form().sections[0].id.clone();
//! let state = engine.add_row(&state, &section_id);
//!
//! // Nothing selected: palette actions target the first section.
//! let state = engine.add_field_at_selection(&state, FieldType::Text).unwrap();
//! let field_id = state.form().fields().next().unwrap().id.clone();
//!
//! let state = engine.select_element(&state, Some(NodeRef::field(&field_id)));
//! let targets = resolve_targets(state.form(), state.selection());
//! assert_eq!(targets.section.as_deref(), Some(section_id.as_str()));
//! ```
//!
//! ## Persistence
//!
//! [`persist`] reads and writes the stored schema document, kept under
//! [`persist::STORAGE_KEY`]. Use [`Engine::load`] to adopt a stored form so
//! that fresh ids never collide with loaded ones.

pub mod command;
pub mod config;
pub mod drag;
pub mod engine;
pub mod error;
pub mod ids;
pub mod mutation;
pub mod persist;
pub mod reorder;
pub mod selection;
pub mod target;
pub mod tree;

// Re-export main types at crate root
pub use command::Command;
pub use config::EngineConfig;
pub use drag::{resolve_drag_end, DragItem, DragScope, ReorderRequest};
pub use engine::Engine;
pub use error::Error;
pub use ids::{IdGenerator, SequentialIds};
pub use mutation::{BuilderState, FieldPatch, FormPatch};
pub use reorder::{reorder, try_reorder};
pub use selection::{retain_live, NodeRef, Selection};
pub use target::{resolve_targets, Targets};
pub use tree::{Column, Field, FieldType, Form, Location, NodeKind, Row, Section, MAX_SPAN};

/// Type aliases for clarity
pub type NodeId = String;
