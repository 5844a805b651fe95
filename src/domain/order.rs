use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::status::OrderStatus;

pub type OrderId = Uuid;

/// One product line of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub title: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(title: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            title: title.into(),
            quantity,
            unit_price,
        }
    }

    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    /// Human-facing sequential number, e.g. "1004".
    pub order_number: String,
    pub customer_name: String,
    pub phone: String,
    pub city: String,
    pub items: Vec<LineItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: Option<DateTime<Utc>>,
    /// Set if and only if `status` is `Delivered`.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Payload written by checkout.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_name: String,
    pub phone: String,
    pub city: String,
    pub items: Vec<LineItem>,
}

impl Order {
    /// Builds a fresh `New` order with an unset creation time.
    pub fn new(
        id: OrderId,
        order_number: impl Into<String>,
        customer_name: impl Into<String>,
        phone: impl Into<String>,
        city: impl Into<String>,
        items: Vec<LineItem>,
    ) -> Self {
        let total = items.iter().map(LineItem::subtotal).sum();
        Self {
            id,
            order_number: order_number.into(),
            customer_name: customer_name.into(),
            phone: phone.into(),
            city: city.into(),
            items,
            total,
            status: OrderStatus::New,
            created_at: None,
            completed_at: None,
        }
    }

    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }
}

/// A status write as sent to the store.
///
/// `completed_at` is populated only for the terminal status, so writing any
/// other status clears a previous completion stamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

impl StatusUpdate {
    pub fn at(status: OrderStatus, now: DateTime<Utc>) -> Self {
        Self {
            status,
            completed_at: status.is_terminal().then_some(now),
        }
    }

    pub fn stamps_completion(&self) -> bool {
        self.completed_at.is_some()
    }
}
