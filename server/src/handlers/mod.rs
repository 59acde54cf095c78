//! Request handlers for the builder session.

mod builder;
mod persistence;

pub use builder::*;
pub use persistence::*;
