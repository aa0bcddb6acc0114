use salesboard_core::DateError;
use thiserror::Error;

use crate::repository::LoadStatus;

/// Failures that abort a load. Nothing is published when one occurs.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read {source_name}: {reason}")]
    SourceUnreadable { source_name: String, reason: String },

    #[error("{source_name} is missing required column \"{column}\"")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },
}

/// Problems confined to one row. The row is skipped and the load continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("malformed row: {reason}")]
    MalformedRow { reason: String },

    #[error(transparent)]
    MalformedDate(#[from] DateError),

    #[error("malformed {field} value \"{value}\"")]
    MalformedNumeric { field: &'static str, value: String },

    #[error("no store with id \"{store_id}\"")]
    UnjoinableOrder { store_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("order data is not available (status: {status})")]
    NotReady { status: LoadStatus },
}
