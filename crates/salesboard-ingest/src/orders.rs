//! Filter, derive and join stage for the order table.
//!
//! Rows are consumed strictly in stream order. A row survives only if it is
//! pending, has a parseable ship date, joins to a known store, and has
//! numeric `items` and `orderValue`. Every other row is dropped and counted.

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use rust_decimal::Decimal;
use salesboard_core::{days_overdue, MergedOrder, PENDING_STATUS};
use serde::Deserialize;

use crate::error::{IngestError, RowError};
use crate::report::LoadReport;
use crate::source::{open_gzip_csv, Records, RowResult};
use crate::stores::StoreIndex;

pub const ORDER_COLUMNS: &[&str] = &[
    "storeId",
    "orderId",
    "destination",
    "items",
    "orderValue",
    "latest_ship_date",
    "shipment_status",
];

/// An order table row exactly as decoded. Only lives for one row's processing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderRow {
    #[serde(rename = "storeId")]
    pub store_id: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub destination: String,
    pub items: String,
    #[serde(rename = "orderValue")]
    pub order_value: String,
    pub latest_ship_date: String,
    pub shipment_status: String,
}

/// Opens the gzip order table as a lazy row sequence.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened, is not gzip, or
/// lacks a required column.
pub fn open_order_rows(path: &Path) -> Result<Records<GzDecoder<File>, RawOrderRow>, IngestError> {
    open_gzip_csv(path, ORDER_COLUMNS)
}

/// Processes one order row.
///
/// Returns `Ok(None)` for rows that are not pending; that is not an error.
///
/// # Errors
///
/// Returns the [`RowError`] that disqualifies the row.
pub fn merge_row(
    row: RawOrderRow,
    stores: &StoreIndex,
    now: DateTime<Utc>,
) -> Result<Option<MergedOrder>, RowError> {
    if row.shipment_status != PENDING_STATUS {
        return Ok(None);
    }

    let days_overdue = days_overdue(&row.latest_ship_date, now)?;

    let store = row
        .store_id
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| stores.get(id))
        .ok_or_else(|| RowError::UnjoinableOrder {
            store_id: row.store_id.clone(),
        })?;

    let items = row
        .items
        .trim()
        .parse::<i64>()
        .map_err(|_| RowError::MalformedNumeric {
            field: "items",
            value: row.items.clone(),
        })?;

    let order_value = Decimal::from_str(row.order_value.trim()).map_err(|_| {
        RowError::MalformedNumeric {
            field: "orderValue",
            value: row.order_value.clone(),
        }
    })?;

    Ok(Some(MergedOrder {
        order_id: row.order_id,
        destination: row.destination,
        items,
        order_value,
        days_overdue,
        marketplace: store.marketplace.clone(),
        country: store.country.clone(),
        shop_name: store.shop_name.clone(),
    }))
}

/// Runs every decoded row through [`merge_row`], preserving input order
/// among survivors.
///
/// # Errors
///
/// Returns the first fatal [`IngestError`] from `rows`; no partial result
/// is returned in that case.
pub fn merge_orders<I>(
    rows: I,
    stores: &StoreIndex,
    now: DateTime<Utc>,
    report: &mut LoadReport,
) -> Result<Vec<MergedOrder>, IngestError>
where
    I: IntoIterator<Item = RowResult<RawOrderRow>>,
{
    let mut merged = Vec::new();

    for row in rows {
        let (line, decoded) = row?;
        report.orders_read += 1;

        match decoded.and_then(|raw| merge_row(raw, stores, now)) {
            Ok(Some(order)) => merged.push(order),
            Ok(None) => report.not_pending += 1,
            Err(error) => {
                tracing::debug!(line, %error, "skipping order row");
                report.record_skipped_order(&error);
            }
        }
    }

    report.orders_merged = merged.len();
    Ok(merged)
}

#[cfg(test)]
#[path = "orders_test.rs"]
mod tests;
