use std::collections::BTreeMap;
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Lifecycle of an order, in display order.
///
/// The machine names (`new`, `confirmed`, ...) are what the store and the
/// status filter speak; [`OrderStatus::label`] is what the admin sees.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    New,
    Confirmed,
    Preparing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Arabic display label.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::New => "جديد",
            OrderStatus::Confirmed => "مؤكد",
            OrderStatus::Preparing => "قيد التجهيز",
            OrderStatus::Shipped => "تم الشحن",
            OrderStatus::Delivered => "تم التسليم",
            OrderStatus::Cancelled => "ملغي",
        }
    }

    /// Color tag used by the status badge.
    pub fn color(self) -> &'static str {
        match self {
            OrderStatus::New => "blue",
            OrderStatus::Confirmed => "indigo",
            OrderStatus::Preparing => "amber",
            OrderStatus::Shipped => "purple",
            OrderStatus::Delivered => "green",
            OrderStatus::Cancelled => "red",
        }
    }

    /// Only `Delivered` carries a completion timestamp.
    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Delivered
    }
}

/// Server-side status filter; `All` is the pseudo-value shown as "الكل".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "الكل",
            StatusFilter::Only(status) => status.label(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        OrderStatus::from_str(s).map(StatusFilter::Only)
    }
}

/// Snapshot of how many orders sit in each status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts {
    counts: BTreeMap<OrderStatus, usize>,
}

impl StatusCounts {
    pub fn tally<'a>(statuses: impl IntoIterator<Item = &'a OrderStatus>) -> Self {
        let mut counts: BTreeMap<OrderStatus, usize> =
            OrderStatus::iter().map(|status| (status, 0)).collect();
        for status in statuses {
            *counts.entry(*status).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, status: OrderStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OrderStatus, usize)> + '_ {
        self.counts.iter().map(|(status, count)| (*status, *count))
    }
}
