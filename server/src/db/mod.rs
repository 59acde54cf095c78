//! Persistence for the saved form schema.

mod pool;
mod schemas;

pub use pool::*;
pub use schemas::*;
