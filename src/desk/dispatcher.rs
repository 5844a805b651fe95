use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use super::error::DeskError;
use super::selection::SelectionSet;
use super::store::OrderStore;
use crate::domain::{Order, OrderId, OrderStatus, StatusUpdate};

/// Sends status changes to the store, one request at a time.
///
/// The in-flight flag backs the disabled state of the status controls; the
/// store remains the authority on concurrent writes.
pub struct MutationDispatcher<S: ?Sized> {
    store: Arc<S>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag however the request ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: OrderStore + ?Sized> MutationDispatcher<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlight<'_>, DeskError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(&self.in_flight))
            .map_err(|_| DeskError::Busy)
    }

    #[instrument(skip_all, fields(order_id = %id, status = %status))]
    pub async fn update_single(&self, id: OrderId, status: OrderStatus) -> Result<Order, DeskError> {
        let _guard = self.begin()?;
        let update = StatusUpdate::at(status, Utc::now());

        match self.store.update_status(id, update).await {
            Ok(order) => {
                info!(order_number = %order.order_number, "Status updated");
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, "Status update rejected");
                Err(e.into())
            }
        }
    }

    /// Updates every selected order. The selection is cleared only on success.
    #[instrument(skip_all, fields(selected = selection.len(), status = %status))]
    pub async fn update_bulk(
        &self,
        selection: &mut SelectionSet,
        status: OrderStatus,
    ) -> Result<Vec<Order>, DeskError> {
        if selection.is_empty() {
            return Err(DeskError::NoOrdersSelected);
        }
        let _guard = self.begin()?;
        let update = StatusUpdate::at(status, Utc::now());

        match self.store.update_status_bulk(selection.ids(), update).await {
            Ok(orders) => {
                info!(updated = orders.len(), "Bulk status update applied");
                selection.clear();
                Ok(orders)
            }
            Err(e) => {
                warn!(error = %e, "Bulk status update rejected");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::FrameworkError;
    use crate::clients::OrderClient;
    use crate::domain::LineItem;
    use crate::mock_framework::{create_mock_client, expect_action, expect_action_many};
    use crate::order_actor::OrderAction;
    use uuid::Uuid;

    fn order(id: OrderId, status: OrderStatus) -> Order {
        Order::new(id, "1001", "هالة", "0500000000", "أبها", vec![LineItem::new("x", 1, 1.0)]).with_status(status)
    }

    fn mock_dispatcher() -> (
        Arc<MutationDispatcher<OrderClient>>,
        tokio::sync::mpsc::Receiver<crate::actor_framework::ResourceRequest<Order>>,
    ) {
        let (inner, rx) = create_mock_client::<Order>(10);
        let store = Arc::new(OrderClient::new(inner));
        (Arc::new(MutationDispatcher::new(store)), rx)
    }

    #[tokio::test]
    async fn test_bulk_with_empty_selection_issues_no_store_call() {
        let (dispatcher, mut rx) = mock_dispatcher();
        let mut selection = SelectionSet::new();

        let result = dispatcher.update_bulk(&mut selection, OrderStatus::Shipped).await;
        assert_eq!(result, Err(DeskError::NoOrdersSelected));
        assert!(rx.try_recv().is_err());
        assert!(!dispatcher.is_busy());
    }

    #[tokio::test]
    async fn test_delivered_requests_completion_stamp_and_others_do_not() {
        for status in [OrderStatus::Delivered, OrderStatus::Shipped, OrderStatus::Cancelled] {
            let (dispatcher, mut rx) = mock_dispatcher();
            let id = Uuid::new_v4();
            let task = {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move { dispatcher.update_single(id, status).await })
            };

            let (got, action, responder) = expect_action(&mut rx).await.expect("Expected Action");
            assert_eq!(got, id);
            let OrderAction::SetStatus(update) = action;
            assert_eq!(update.status, status);
            assert_eq!(update.stamps_completion(), status == OrderStatus::Delivered);
            responder.send(Ok(order(id, status))).unwrap();

            assert_eq!(task.await.unwrap().unwrap().status, status);
        }
    }

    #[tokio::test]
    async fn test_bulk_delivered_stamps_completion() {
        let (dispatcher, mut rx) = mock_dispatcher();
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let mut selection = SelectionSet::new();
        ids.iter().for_each(|id| selection.toggle(*id));

        let task = tokio::spawn(async move {
            let result = dispatcher.update_bulk(&mut selection, OrderStatus::Delivered).await;
            (result, selection)
        });

        let (_, action, responder) = expect_action_many(&mut rx).await.expect("Expected ActionMany");
        let OrderAction::SetStatus(update) = action;
        assert!(update.stamps_completion());
        responder
            .send(Ok(ids.iter().map(|id| order(*id, OrderStatus::Delivered)).collect()))
            .unwrap();

        let (result, selection) = task.await.unwrap();
        assert_eq!(result.unwrap().len(), 2);
        assert!(selection.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_success_clears_selection_and_failure_keeps_it() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];

        // success
        let (dispatcher, mut rx) = mock_dispatcher();
        let mut selection = SelectionSet::new();
        ids.iter().for_each(|id| selection.toggle(*id));
        let task = tokio::spawn(async move {
            let result = dispatcher.update_bulk(&mut selection, OrderStatus::Cancelled).await;
            (result, selection)
        });
        let (sent, _, responder) = expect_action_many(&mut rx).await.expect("Expected ActionMany");
        let mut expected = ids.clone();
        expected.sort();
        assert_eq!(sent, expected);
        responder
            .send(Ok(ids.iter().map(|id| order(*id, OrderStatus::Cancelled)).collect()))
            .unwrap();
        let (result, selection) = task.await.unwrap();
        assert!(result.is_ok());
        assert!(selection.is_empty());

        // failure
        let (dispatcher, mut rx) = mock_dispatcher();
        let mut selection = SelectionSet::new();
        ids.iter().for_each(|id| selection.toggle(*id));
        let task = tokio::spawn(async move {
            let result = dispatcher.update_bulk(&mut selection, OrderStatus::Cancelled).await;
            (result, selection)
        });
        let (_, _, responder) = expect_action_many(&mut rx).await.expect("Expected ActionMany");
        responder
            .send(Err(FrameworkError::Rejected("permission denied".to_string())))
            .unwrap();
        let (result, selection) = task.await.unwrap();
        assert_eq!(result.unwrap_err().user_message(), "permission denied");
        assert_eq!(selection.ids(), expected);
    }

    #[tokio::test]
    async fn test_overlapping_update_is_refused_while_in_flight() {
        let (dispatcher, mut rx) = mock_dispatcher();
        let id = Uuid::new_v4();
        let first = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.update_single(id, OrderStatus::Confirmed).await })
        };

        let (_, _, responder) = expect_action(&mut rx).await.expect("Expected Action");
        assert!(dispatcher.is_busy());
        assert_eq!(
            dispatcher.update_single(id, OrderStatus::Preparing).await,
            Err(DeskError::Busy)
        );

        responder.send(Ok(order(id, OrderStatus::Confirmed))).unwrap();
        assert!(first.await.unwrap().is_ok());
        assert!(!dispatcher.is_busy());
    }
}
