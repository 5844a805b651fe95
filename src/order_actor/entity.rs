use chrono::Utc;

use super::actions::OrderAction;
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderId};

/// First order number handed out; the creation sequence is added to it.
const ORDER_NUMBER_BASE: u64 = 1000;

impl Entity for Order {
    type Id = OrderId;
    type CreatePayload = OrderCreate;
    type Action = OrderAction;
    type ActionResult = Order;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Creates a new Order from checkout data.
    ///
    /// The order starts as `New`, stamped with the current time, and its
    /// number is derived from the creation sequence.
    fn from_create(id: OrderId, sequence: u64, payload: OrderCreate) -> Result<Self, String> {
        let order = Order::new(
            id,
            (ORDER_NUMBER_BASE + sequence).to_string(),
            payload.customer_name.trim(),
            payload.phone.trim(),
            payload.city.trim(),
            payload.items,
        );
        Ok(order.created(Utc::now()))
    }

    /// Rejects checkouts the storefront should never have submitted.
    fn on_create(&mut self) -> Result<(), String> {
        if self.customer_name.is_empty() {
            return Err("customer name is required".to_string());
        }
        if self.phone.is_empty() {
            return Err("phone is required".to_string());
        }
        if self.items.is_empty() {
            return Err("order has no items".to_string());
        }
        for item in &self.items {
            if item.quantity == 0 {
                return Err(format!("quantity for '{}' must be at least 1", item.title));
            }
            if !item.unit_price.is_finite() || item.unit_price < 0.0 {
                return Err(format!("invalid unit price for '{}'", item.title));
            }
        }
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<Order, String> {
        match action {
            OrderAction::SetStatus(update) => {
                self.status = update.status;
                self.completed_at = update.completed_at;
                Ok(self.clone())
            }
        }
    }
}
