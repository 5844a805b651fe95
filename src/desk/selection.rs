use std::collections::HashSet;

use crate::domain::OrderId;

/// Orders marked for a bulk status change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<OrderId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: OrderId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Deselects the page if all of it is selected, otherwise selects all of it.
    pub fn toggle_all_visible(&mut self, page_ids: &[OrderId]) {
        if page_ids.is_empty() {
            return;
        }
        if page_ids.iter().all(|id| self.ids.contains(id)) {
            for id in page_ids {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(page_ids.iter().copied());
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops ids that left the filtered list. Ids that are only off the
    /// current page are part of `filtered` and survive.
    pub fn retain_filtered<'a>(&mut self, filtered: impl IntoIterator<Item = &'a OrderId>) -> usize {
        let keep: HashSet<&OrderId> = filtered.into_iter().collect();
        let before = self.ids.len();
        self.ids.retain(|id| keep.contains(id));
        before - self.ids.len()
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Snapshot of the selection in a stable order.
    pub fn ids(&self) -> Vec<OrderId> {
        let mut ids: Vec<OrderId> = self.ids.iter().copied().collect();
        ids.sort();
        ids
    }
}
