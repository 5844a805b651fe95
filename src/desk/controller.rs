use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::cache::{ResultCache, Snapshot};
use super::dispatcher::MutationDispatcher;
use super::error::DeskError;
use super::notify::{NotificationId, NotificationQueue, NotificationSender};
use super::pipeline::{self, PageView, SortKey, ViewQuery};
use super::selection::SelectionSet;
use super::store::OrderStore;
use crate::domain::{OrderId, OrderStatus, StatusCounts, StatusFilter};

/// State of one admin's orders screen.
///
/// Holds the cached snapshot, the query the admin typed or clicked, the
/// selection and the notification queue. Every read goes through
/// [`OrdersDesk::view`], which re-derives the page from scratch.
pub struct OrdersDesk<S: ?Sized> {
    dispatcher: MutationDispatcher<S>,
    cache: ResultCache,
    query: ViewQuery,
    selection: SelectionSet,
    notifications: NotificationQueue,
    stale: bool,
}

impl<S: OrderStore + ?Sized> OrdersDesk<S> {
    /// Fetches the unfiltered list and counts.
    #[instrument(skip(store))]
    pub async fn load(store: Arc<S>, page_size: usize) -> Result<Self, DeskError> {
        let snapshot = Snapshot::fetch(&*store, StatusFilter::All).await?;
        info!(rows = snapshot.orders.len(), "Orders desk loaded");
        Ok(Self {
            dispatcher: MutationDispatcher::new(store),
            cache: ResultCache::new(snapshot),
            query: ViewQuery::new(page_size),
            selection: SelectionSet::new(),
            notifications: NotificationQueue::new(),
            stale: false,
        })
    }

    pub fn view(&self) -> PageView<'_> {
        pipeline::derive_page(self.cache.orders(), &self.query)
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn counts(&self) -> &StatusCounts {
        self.cache.counts()
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.cache.filter()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// True when a write landed but the follow-up re-read failed, so the
    /// cached rows predate it. Cleared by the next successful refresh.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Status controls are disabled while this is true.
    pub fn is_busy(&self) -> bool {
        self.dispatcher.is_busy()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query.search = term.into();
        self.query.page = 1;
        self.prune_selection();
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.query.sort = self.query.sort.toggled(key);
        self.query.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page;
    }

    /// Re-fetches from the store with the new server-side filter.
    #[instrument(skip(self))]
    pub async fn set_status_filter(&mut self, filter: StatusFilter) -> Result<(), DeskError> {
        let snapshot = Snapshot::fetch(self.dispatcher.store(), filter).await?;
        self.cache.replace(snapshot);
        self.stale = false;
        self.query.page = 1;
        self.prune_selection();
        Ok(())
    }

    pub fn toggle_selected(&mut self, id: OrderId) {
        self.selection.toggle(id);
    }

    pub fn toggle_all_visible(&mut self) {
        let page_ids = self.view().ids();
        self.selection.toggle_all_visible(&page_ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Changes one order's status, then reloads the current view.
    ///
    /// The result reflects the write alone; see [`OrdersDesk::is_stale`].
    pub async fn change_status(&mut self, id: OrderId, status: OrderStatus) -> Result<(), DeskError> {
        self.dispatcher.update_single(id, status).await?;
        self.refresh_after_write().await;
        Ok(())
    }

    /// Changes every selected order's status, then reloads the current view.
    /// Returns how many orders were updated.
    pub async fn change_status_selected(&mut self, status: OrderStatus) -> Result<usize, DeskError> {
        let updated = self
            .dispatcher
            .update_bulk(&mut self.selection, status)
            .await?
            .len();
        self.refresh_after_write().await;
        Ok(updated)
    }

    /// Replaces the cache with a fresh read under the current filter.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), DeskError> {
        let snapshot = Snapshot::fetch(self.dispatcher.store(), self.cache.filter()).await?;
        let revision = self.cache.replace(snapshot);
        self.stale = false;
        debug!(revision, "Cache replaced");
        self.prune_selection();
        Ok(())
    }

    async fn refresh_after_write(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Write applied but re-read failed; keeping previous rows");
            self.stale = true;
        }
    }

    /// Queues a message announcing the order's current status.
    pub fn queue_notification(&mut self, id: OrderId) -> Result<NotificationId, DeskError> {
        let order = self.cache.find(id).ok_or(DeskError::UnknownOrder(id))?;
        Ok(self.notifications.enqueue(order, order.status.label()))
    }

    pub fn send_next_notification(
        &mut self,
        sender: &mut dyn NotificationSender,
    ) -> Result<NotificationId, DeskError> {
        self.notifications.send_next(sender)
    }

    fn prune_selection(&mut self) {
        let filtered = pipeline::filter_orders(self.cache.orders(), &self.query.search);
        let removed = self
            .selection
            .retain_filtered(filtered.iter().map(|order| &order.id));
        if removed > 0 {
            debug!(removed, "Pruned selection to the filtered list");
        }
    }
}
