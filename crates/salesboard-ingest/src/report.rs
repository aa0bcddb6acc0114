use serde::Serialize;

use crate::error::RowError;

/// Counts collected during one load. Purely diagnostic: skipped rows are
/// dropped whether or not anyone reads this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub stores_indexed: usize,
    pub store_rows_skipped: usize,
    pub orders_read: usize,
    pub not_pending: usize,
    pub malformed_rows: usize,
    pub malformed_dates: usize,
    pub malformed_numeric: usize,
    pub unmatched_stores: usize,
    pub orders_merged: usize,
}

impl LoadReport {
    pub(crate) fn record_skipped_order(&mut self, error: &RowError) {
        match error {
            RowError::MalformedRow { .. } => self.malformed_rows += 1,
            RowError::MalformedDate(_) => self.malformed_dates += 1,
            RowError::MalformedNumeric { .. } => self.malformed_numeric += 1,
            RowError::UnjoinableOrder { .. } => self.unmatched_stores += 1,
        }
    }

    /// Pending orders and store rows that were dropped for a row-level problem.
    #[must_use]
    pub fn rows_skipped(&self) -> usize {
        self.store_rows_skipped
            + self.malformed_rows
            + self.malformed_dates
            + self.malformed_numeric
            + self.unmatched_stores
    }
}
