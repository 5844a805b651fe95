use tracing::{debug, instrument};

use super::store::OrderStore;
use crate::domain::{Order, OrderId, StatusCounts, StatusFilter};
use crate::order_actor::OrderError;

/// One consistent read of the store: the filtered list and the counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub filter: StatusFilter,
    pub orders: Vec<Order>,
    pub counts: StatusCounts,
}

impl Snapshot {
    #[instrument(skip(store))]
    pub async fn fetch<S: OrderStore + ?Sized>(store: &S, filter: StatusFilter) -> Result<Self, OrderError> {
        let orders = store.list_orders(filter).await?;
        let counts = store.status_counts().await?;
        debug!(rows = orders.len(), "Snapshot fetched");
        Ok(Self { filter, orders, counts })
    }
}

/// Last known-good server state held by the desk.
///
/// Never patched in place: every refresh swaps the whole snapshot.
#[derive(Debug, Default)]
pub struct ResultCache {
    snapshot: Snapshot,
    revision: u64,
}

impl ResultCache {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot, revision: 1 }
    }

    /// Swaps in a new snapshot and returns the new revision.
    pub fn replace(&mut self, snapshot: Snapshot) -> u64 {
        self.snapshot = snapshot;
        self.revision += 1;
        self.revision
    }

    pub fn orders(&self) -> &[Order] {
        &self.snapshot.orders
    }

    pub fn counts(&self) -> &StatusCounts {
        &self.snapshot.counts
    }

    pub fn filter(&self) -> StatusFilter {
        self.snapshot.filter
    }

    pub fn find(&self, id: OrderId) -> Option<&Order> {
        self.snapshot.orders.iter().find(|order| order.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineItem, OrderStatus};
    use uuid::Uuid;

    fn snapshot(names: &[&str]) -> Snapshot {
        let orders: Vec<Order> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Order::new(Uuid::new_v4(), (1000 + i).to_string(), *name, "050", "تبوك", vec![LineItem::new("x", 1, 1.0)])
            })
            .collect();
        let counts = StatusCounts::tally(orders.iter().map(|o| &o.status));
        Snapshot { filter: StatusFilter::All, orders, counts }
    }

    #[test]
    fn test_replace_swaps_everything() {
        let mut cache = ResultCache::new(snapshot(&["a", "b"]));
        let first = cache.orders()[0].id;
        assert!(cache.find(first).is_some());

        let mut next = snapshot(&["c"]);
        next.filter = StatusFilter::Only(OrderStatus::New);
        assert_eq!(cache.replace(next), 2);

        assert!(cache.find(first).is_none());
        assert_eq!(cache.orders().len(), 1);
        assert_eq!(cache.counts().get(OrderStatus::New), 1);
        assert_eq!(cache.filter(), StatusFilter::Only(OrderStatus::New));
    }
}
