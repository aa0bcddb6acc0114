use std::time::Instant;

use salesboard_core::{Clock, DataSources, MergedOrder};

use crate::error::IngestError;
use crate::orders::{merge_orders, open_order_rows};
use crate::report::LoadReport;
use crate::stores::build_store_index;

/// The merged order set and the diagnostics gathered while building it.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub orders: Vec<MergedOrder>,
    pub report: LoadReport,
}

/// Builds the store index, then streams the order table through it.
///
/// The store table is read to completion before the first order row is
/// decoded. "Now" is sampled once, so every row in a load shares it.
///
/// # Errors
///
/// Returns [`IngestError`] if either table cannot be opened or read to the end.
pub fn load_and_merge(sources: &DataSources, clock: &dyn Clock) -> Result<LoadOutcome, IngestError> {
    let started = Instant::now();
    let mut report = LoadReport::default();

    let stores = build_store_index(&sources.stores_path, &mut report)?;
    tracing::info!(
        path = %sources.stores_path.display(),
        stores = stores.len(),
        skipped = report.store_rows_skipped,
        "store index built"
    );

    let rows = open_order_rows(&sources.orders_path)?;
    let orders = merge_orders(rows, &stores, clock.now(), &mut report)?;

    let skipped = report.rows_skipped();
    if skipped > 0 {
        tracing::warn!(
            skipped,
            malformed_rows = report.malformed_rows,
            malformed_dates = report.malformed_dates,
            malformed_numeric = report.malformed_numeric,
            unmatched_stores = report.unmatched_stores,
            store_rows_skipped = report.store_rows_skipped,
            "rows dropped during load"
        );
    }
    tracing::info!(
        path = %sources.orders_path.display(),
        orders_read = report.orders_read,
        orders_merged = report.orders_merged,
        elapsed_ms = started.elapsed().as_millis(),
        "order data merged"
    );

    Ok(LoadOutcome { orders, report })
}
