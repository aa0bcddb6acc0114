use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use salesboard_core::StoreRecord;
use serde::Deserialize;

use crate::error::{IngestError, RowError};
use crate::report::LoadReport;
use crate::source::{open_csv, Records};

pub const STORE_COLUMNS: &[&str] = &["storeId", "marketplace", "country", "shopName"];

/// A store table row before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStoreRow {
    #[serde(rename = "storeId")]
    pub store_id: String,
    pub marketplace: String,
    pub country: String,
    #[serde(rename = "shopName")]
    pub shop_name: String,
}

impl TryFrom<RawStoreRow> for StoreRecord {
    type Error = RowError;

    fn try_from(row: RawStoreRow) -> Result<Self, Self::Error> {
        let store_id = row
            .store_id
            .trim()
            .parse::<i64>()
            .map_err(|_| RowError::MalformedRow {
                reason: format!("storeId \"{}\" is not an integer", row.store_id),
            })?;

        Ok(StoreRecord {
            store_id,
            marketplace: row.marketplace,
            country: row.country,
            shop_name: row.shop_name.trim().to_owned(),
        })
    }
}

/// Stores keyed by id. Later inserts for the same id replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct StoreIndex {
    stores: HashMap<i64, StoreRecord>,
}

impl StoreIndex {
    #[must_use]
    pub fn get(&self, store_id: i64) -> Option<&StoreRecord> {
        self.stores.get(&store_id)
    }

    /// Returns the record that was replaced, if any.
    pub fn insert(&mut self, record: StoreRecord) -> Option<StoreRecord> {
        self.stores.insert(record.store_id, record)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

/// Builds the store index from the table at `path`.
///
/// # Errors
///
/// Returns [`IngestError`] if the table cannot be opened or read. Malformed
/// rows are skipped and counted in `report`.
pub fn build_store_index(path: &Path, report: &mut LoadReport) -> Result<StoreIndex, IngestError> {
    let rows = open_csv::<RawStoreRow>(path, STORE_COLUMNS)?;
    index_store_rows(rows, report)
}

/// Folds decoded store rows into an index, skipping malformed ones.
///
/// # Errors
///
/// Returns the first fatal [`IngestError`] produced by `rows`.
pub fn index_store_rows<R: Read>(
    rows: Records<R, RawStoreRow>,
    report: &mut LoadReport,
) -> Result<StoreIndex, IngestError> {
    let mut index = StoreIndex::default();

    for row in rows {
        let (line, decoded) = row?;
        match decoded.and_then(StoreRecord::try_from) {
            Ok(record) => {
                if let Some(previous) = index.insert(record) {
                    tracing::debug!(
                        line,
                        store_id = previous.store_id,
                        "duplicate storeId; keeping later row"
                    );
                }
            }
            Err(error) => {
                tracing::debug!(line, %error, "skipping store row");
                report.store_rows_skipped += 1;
            }
        }
    }

    report.stores_indexed = index.len();
    Ok(index)
}
