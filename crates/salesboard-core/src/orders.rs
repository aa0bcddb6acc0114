use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status an order must carry to be eligible for the merged set.
/// Matched exactly and case-sensitively.
pub const PENDING_STATUS: &str = "Pending";

/// A row of the store table, keyed by `store_id` in the store index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    pub store_id: i64,
    pub marketplace: String,
    /// Three-letter country code, e.g. `"GBR"`.
    pub country: String,
    /// Shop name with surrounding whitespace removed.
    pub shop_name: String,
}

/// A pending order joined with the descriptive fields of its store.
///
/// This is the unit served to clients. `items` and `order_value` serialize
/// as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedOrder {
    pub order_id: String,
    pub destination: String,
    pub items: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_value: Decimal,
    /// Positive when the latest ship date has passed.
    pub days_overdue: i64,
    pub marketplace: String,
    pub country: String,
    pub shop_name: String,
}
