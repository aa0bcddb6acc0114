//! Sorted, paginated views over the merged order set.
//!
//! Parameter parsing is deliberately forgiving: anything that is not a
//! positive integer falls back to the default page or limit, and any sort
//! direction other than `asc` means descending.

use serde::Serialize;

use crate::MergedOrder;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// `"asc"` selects ascending; every other value, including none, is descending.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// Resolved query parameters. Construct with [`SalesQuery::from_raw`] to
/// apply the default policy, or directly when values are already known good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesQuery {
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
    pub direction: SortDirection,
}

impl Default for SalesQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            direction: SortDirection::Descending,
        }
    }
}

impl SalesQuery {
    #[must_use]
    pub fn from_raw(page: Option<&str>, limit: Option<&str>, sort_direction: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
            direction: SortDirection::parse(sort_direction),
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPage {
    pub data: Vec<MergedOrder>,
    pub current_page: usize,
    pub total_pages: usize,
    pub more: bool,
}

/// Sorts a copy of `orders` by `days_overdue` and slices out the requested page.
///
/// The sort is stable in both directions, so orders with equal
/// `days_overdue` keep their load order. `orders` is never reordered.
#[must_use]
pub fn query_orders(orders: &[MergedOrder], query: &SalesQuery) -> SalesPage {
    let limit = query.limit.max(1);
    let page = query.page.max(1);
    let total = orders.len();

    let mut sorted: Vec<&MergedOrder> = orders.iter().collect();
    match query.direction {
        SortDirection::Ascending => sorted.sort_by(|a, b| a.days_overdue.cmp(&b.days_overdue)),
        SortDirection::Descending => sorted.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue)),
    }

    let start = (page - 1).saturating_mul(limit);
    let end = start.saturating_add(limit);
    let data = sorted[start.min(total)..end.min(total)]
        .iter()
        .map(|order| (*order).clone())
        .collect();

    SalesPage {
        data,
        current_page: page,
        total_pages: total.div_ceil(limit),
        more: end < total,
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
