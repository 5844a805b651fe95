//! Order-specific domain logic: checkout validation and status transitions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
