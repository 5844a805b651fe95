use async_trait::async_trait;

use crate::domain::{Order, OrderId, StatusCounts, StatusFilter, StatusUpdate};
use crate::order_actor::OrderError;

/// The order store as seen by the admin desk.
///
/// Mutations answer with the rows they wrote; the desk still re-reads the
/// list afterwards because a status change can move rows across the active
/// filter.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders matching `filter`, newest first.
    async fn list_orders(&self, filter: StatusFilter) -> Result<Vec<Order>, OrderError>;

    async fn status_counts(&self) -> Result<StatusCounts, OrderError>;

    async fn update_status(&self, id: OrderId, update: StatusUpdate) -> Result<Order, OrderError>;

    /// Applied as one request: either every order is updated or none is.
    async fn update_status_bulk(
        &self,
        ids: Vec<OrderId>,
        update: StatusUpdate,
    ) -> Result<Vec<Order>, OrderError>;
}
