//! Search, sort and pagination over the cached order list.
//!
//! Everything here is a pure function of its inputs, so the desk simply
//! re-runs it after every keystroke or click.

use std::cmp::Ordering;

use crate::domain::{Order, OrderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    OrderNumber,
    CustomerName,
    Phone,
    City,
    Total,
    Status,
    CreatedAt,
    CompletedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Same key flips the direction; a new key starts ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.flipped())
        } else {
            Self::new(key, SortDirection::Asc)
        }
    }
}

/// Everything the pipeline needs besides the rows themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewQuery {
    pub search: String,
    pub sort: SortConfig,
    /// 1-based; out-of-range values are clamped.
    pub page: usize,
    pub page_size: usize,
}

impl ViewQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            sort: SortConfig::default(),
            page: 1,
            page_size,
        }
    }
}

/// The page handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub rows: Vec<&'a Order>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

impl PageView<'_> {
    pub fn ids(&self) -> Vec<OrderId> {
        self.rows.iter().map(|order| order.id).collect()
    }
}

/// True when any searchable field matches. A blank term matches everything.
///
/// Name and city compare case-insensitively; order number and phone are
/// plain substring checks.
pub fn matches_search(order: &Order, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    let number = term.trim_start_matches('#');

    (!number.is_empty() && order.order_number.contains(number))
        || order.phone.contains(term)
        || order.customer_name.to_lowercase().contains(&needle)
        || order.city.to_lowercase().contains(&needle)
}

pub fn filter_orders<'a>(orders: &'a [Order], term: &str) -> Vec<&'a Order> {
    orders.iter().filter(|order| matches_search(order, term)).collect()
}

/// Missing values order below every present value.
pub fn compare_by(a: &Order, b: &Order, key: SortKey) -> Ordering {
    match key {
        SortKey::OrderNumber => numeric(&a.order_number).cmp(&numeric(&b.order_number)),
        SortKey::CustomerName => a.customer_name.cmp(&b.customer_name),
        SortKey::Phone => a.phone.cmp(&b.phone),
        SortKey::City => a.city.cmp(&b.city),
        SortKey::Total => a.total.total_cmp(&b.total),
        SortKey::Status => a.status.cmp(&b.status),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::CompletedAt => a.completed_at.cmp(&b.completed_at),
    }
}

fn numeric(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

/// Stable: rows with equal keys keep their incoming order in both directions.
pub fn sort_orders(rows: &mut [&Order], sort: SortConfig) {
    rows.sort_by(|a, b| {
        let ordering = compare_by(a, b, sort.key);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(len, page_size))
}

/// Runs search, sort and pagination in one pass.
pub fn derive_page<'a>(orders: &'a [Order], query: &ViewQuery) -> PageView<'a> {
    let mut matches = filter_orders(orders, &query.search);
    sort_orders(&mut matches, query.sort);

    let size = query.page_size.max(1);
    let total_matches = matches.len();
    let page = clamp_page(query.page, total_matches, size);
    let start = (page - 1) * size;
    let end = (start + size).min(total_matches);
    let rows = matches.get(start..end).map(<[_]>::to_vec).unwrap_or_default();

    PageView {
        rows,
        page,
        total_pages: total_pages(total_matches, size),
        total_matches,
    }
}
