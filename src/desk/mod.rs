//! The admin orders screen: cached snapshot, derived page, selection,
//! status changes and the outbound message queue.

pub mod cache;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod notify;
pub mod pipeline;
pub mod selection;
pub mod store;

pub use controller::OrdersDesk;
pub use error::DeskError;
pub use store::OrderStore;
