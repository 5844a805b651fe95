use std::cmp::Reverse;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{FrameworkError, Predicate, ResourceClient};
use crate::desk::OrderStore;
use crate::domain::{Order, OrderCreate, OrderId, StatusCounts, StatusFilter, StatusUpdate};
use crate::order_actor::{OrderAction, OrderError};

/// Client for interacting with the Order actor.
///
/// Serves checkout on the storefront side and implements [`OrderStore`]
/// for the admin desk.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

crate::impl_basic_client!(OrderClient, Order, OrderError, order);

impl OrderClient {
    #[instrument(skip(self, order), fields(customer = %order.customer_name, items = order.items.len()))]
    pub async fn create_order(&self, order: OrderCreate) -> Result<OrderId, OrderError> {
        debug!("Sending request");
        let id = self.inner.create(order).await.map_err(|e| match e {
            FrameworkError::Rejected(reason) => OrderError::ValidationError(reason),
            other => OrderError::from(other),
        })?;
        info!(order_id = %id, "Order placed");
        Ok(id)
    }
}

#[async_trait]
impl OrderStore for OrderClient {
    #[instrument(skip(self))]
    async fn list_orders(&self, filter: StatusFilter) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        let predicate: Option<Predicate<Order>> = match filter {
            StatusFilter::All => None,
            StatusFilter::Only(_) => Some(Box::new(move |order: &Order| filter.matches(order.status))),
        };
        let mut orders = self.inner.list(predicate).await?;
        orders.sort_by_key(|order| {
            Reverse((order.created_at, order.order_number.parse::<u64>().ok()))
        });
        Ok(orders)
    }

    #[instrument(skip(self))]
    async fn status_counts(&self) -> Result<StatusCounts, OrderError> {
        debug!("Sending request");
        let orders = self.inner.list(None).await?;
        Ok(StatusCounts::tally(orders.iter().map(|order| &order.status)))
    }

    #[instrument(skip(self, update), fields(status = %update.status))]
    async fn update_status(&self, id: OrderId, update: StatusUpdate) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, OrderAction::SetStatus(update))
            .await
            .map_err(|e| {
                warn!(error = %e, "Status update failed");
                OrderError::from(e)
            })
    }

    #[instrument(skip(self, ids, update), fields(count = ids.len(), status = %update.status))]
    async fn update_status_bulk(
        &self,
        ids: Vec<OrderId>,
        update: StatusUpdate,
    ) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action_many(ids, OrderAction::SetStatus(update))
            .await
            .map_err(|e| {
                warn!(error = %e, "Bulk status update failed");
                OrderError::from(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineItem, OrderStatus};
    use crate::mock_framework::{create_mock_client, expect_action_many, expect_create, expect_list};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn order(number: &str, minutes_ago: i64, status: OrderStatus) -> Order {
        Order::new(Uuid::new_v4(), number, "ريم", "0500000000", "مكة", vec![LineItem::new("x", 1, 1.0)])
            .created(Utc::now() - Duration::minutes(minutes_ago))
            .with_status(status)
    }

    #[tokio::test]
    async fn test_list_orders_is_newest_first_and_filtered_in_actor() {
        let (inner, mut rx) = create_mock_client::<Order>(10);
        let client = OrderClient::new(inner);

        let task = tokio::spawn(async move {
            client.list_orders(StatusFilter::Only(OrderStatus::Shipped)).await
        });

        let (filter, responder) = expect_list(&mut rx).await.expect("Expected List request");
        let filter = filter.expect("status filter should run inside the actor");
        let old = order("1001", 30, OrderStatus::Shipped);
        let new = order("1002", 5, OrderStatus::Shipped);
        assert!(filter(&old));
        assert!(!filter(&order("1003", 1, OrderStatus::New)));
        responder.send(Ok(vec![old.clone(), new.clone()])).unwrap();

        let listed = task.await.unwrap().unwrap();
        assert_eq!(listed, vec![new, old]);
    }

    #[tokio::test]
    async fn test_create_rejection_becomes_validation_error() {
        let (inner, mut rx) = create_mock_client::<Order>(10);
        let client = OrderClient::new(inner);

        let task = tokio::spawn(async move {
            client
                .create_order(OrderCreate {
                    customer_name: "نورة".to_string(),
                    phone: "0540000000".to_string(),
                    city: "الدمام".to_string(),
                    items: vec![],
                })
                .await
        });

        let (payload, responder) = expect_create(&mut rx).await.expect("Expected Create request");
        assert_eq!(payload.customer_name, "نورة");
        responder
            .send(Err(FrameworkError::Rejected("order has no items".to_string())))
            .unwrap();

        let result = task.await.unwrap();
        assert_eq!(result, Err(OrderError::ValidationError("order has no items".to_string())));
    }

    #[tokio::test]
    async fn test_bulk_update_sends_one_request() {
        let (inner, mut rx) = create_mock_client::<Order>(10);
        let client = OrderClient::new(inner);
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let sent = ids.clone();

        let task = tokio::spawn(async move {
            client
                .update_status_bulk(sent, StatusUpdate::at(OrderStatus::Cancelled, Utc::now()))
                .await
        });

        let (got_ids, action, responder) = expect_action_many(&mut rx).await.expect("Expected ActionMany");
        assert_eq!(got_ids, ids);
        let OrderAction::SetStatus(update) = action;
        assert_eq!(update.status, OrderStatus::Cancelled);
        responder.send(Err(FrameworkError::NotFound(ids[1].to_string()))).unwrap();

        assert_eq!(task.await.unwrap(), Err(OrderError::NotFound(ids[1].to_string())));
        assert!(rx.try_recv().is_err());
    }
}
