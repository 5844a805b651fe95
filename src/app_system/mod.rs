//! System orchestration, startup, and shutdown logic.

pub mod config;
pub mod order_system;
pub mod tracing;

pub use config::*;
pub use order_system::*;
pub use self::tracing::*;
