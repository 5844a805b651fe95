//! Outbound customer notifications, queued per order and sent by hand.

use tracing::{info, instrument, warn};
use url::Url;

use super::error::DeskError;
use crate::domain::Order;

pub type NotificationId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub phone: String,
    pub message: String,
    pub sent: bool,
}

/// Delivery capability. Success only means the message was handed off.
pub trait NotificationSender {
    fn send(&mut self, phone: &str, message: &str) -> Result<(), DeskError>;
}

/// Receives the deep link the sender built.
pub trait LinkOpener {
    fn open(&mut self, link: &Url) -> Result<(), DeskError>;
}

/// Opener for headless runs: the link is written to the log.
#[derive(Debug, Default)]
pub struct LogOpener;

impl LinkOpener for LogOpener {
    fn open(&mut self, link: &Url) -> Result<(), DeskError> {
        info!(link = %link, "Opening messaging link");
        Ok(())
    }
}

/// Sends by opening a WhatsApp-style `{base}/{phone}?text=...` link.
#[derive(Debug)]
pub struct WhatsAppLinkSender<O> {
    base: Url,
    opener: O,
}

impl<O: LinkOpener> WhatsAppLinkSender<O> {
    pub fn new(base: Url, opener: O) -> Self {
        Self { base, opener }
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    pub fn link_for(&self, phone: &str, message: &str) -> Result<Url, DeskError> {
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(DeskError::Notify(format!("phone '{phone}' has no digits")));
        }
        let mut link = self.base.clone();
        link.path_segments_mut()
            .map_err(|_| DeskError::Notify(format!("'{}' cannot take a path", self.base)))?
            .pop_if_empty()
            .push(&digits);
        link.query_pairs_mut().clear().append_pair("text", message);
        Ok(link)
    }
}

impl<O: LinkOpener> NotificationSender for WhatsAppLinkSender<O> {
    fn send(&mut self, phone: &str, message: &str) -> Result<(), DeskError> {
        let link = self.link_for(phone, message)?;
        self.opener.open(&link)
    }
}

pub fn render_message(order: &Order, status_label: &str) -> String {
    format!(
        "مرحباً {}، طلبك رقم #{} أصبح: {}",
        order.customer_name, order.order_number, status_label
    )
}

/// Append-only FIFO of pending messages.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: Vec<Notification>,
    next_id: NotificationId,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for `order`. Repeated calls queue repeated messages.
    pub fn enqueue(&mut self, order: &Order, status_label: &str) -> NotificationId {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Notification {
            id,
            phone: order.phone.clone(),
            message: render_message(order, status_label),
            sent: false,
        });
        id
    }

    /// Sends the oldest unsent message and marks it sent.
    ///
    /// If the sender fails the item stays pending.
    #[instrument(skip_all)]
    pub fn send_next(&mut self, sender: &mut dyn NotificationSender) -> Result<NotificationId, DeskError> {
        let Some(item) = self.items.iter_mut().find(|item| !item.sent) else {
            return Err(DeskError::NoPendingMessages);
        };
        if let Err(e) = sender.send(&item.phone, &item.message) {
            warn!(notification_id = item.id, error = %e, "Notification not sent");
            return Err(e);
        }
        item.sent = true;
        info!(notification_id = item.id, "Notification sent");
        Ok(item.id)
    }

    pub fn pending(&self) -> usize {
        self.items.iter().filter(|item| !item.sent).count()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }
}
