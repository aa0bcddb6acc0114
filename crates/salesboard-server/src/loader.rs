//! Background load of the order data at startup.
//!
//! The listener is bound before the load finishes; until it does, `/sales`
//! answers with the not-ready error and `/health` reports `loading`.

use std::sync::Arc;

use salesboard_core::{DataSources, SystemClock};
use salesboard_ingest::OrderRepository;
use tokio::task::JoinHandle;

/// Runs the load on the blocking pool. The returned handle resolves to
/// `true` if the data was published.
pub fn spawn_load(repository: Arc<OrderRepository>, sources: DataSources) -> JoinHandle<bool> {
    tokio::task::spawn_blocking(move || {
        tracing::info!(
            orders = %sources.orders_path.display(),
            stores = %sources.stores_path.display(),
            "loading order data"
        );
        match repository.load(&sources, &SystemClock) {
            Ok(report) => {
                tracing::info!(
                    orders = report.orders_merged,
                    "data processing complete, server is ready to handle requests"
                );
                true
            }
            Err(error) => {
                tracing::error!(%error, "failed to initialize order data");
                false
            }
        }
    })
}
