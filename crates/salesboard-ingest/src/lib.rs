pub mod error;
pub mod orders;
pub mod pipeline;
pub mod report;
pub mod repository;
pub mod source;
pub mod stores;

pub use error::{IngestError, RepositoryError, RowError};
pub use orders::{merge_orders, merge_row, open_order_rows, RawOrderRow, ORDER_COLUMNS};
pub use pipeline::{load_and_merge, LoadOutcome};
pub use report::LoadReport;
pub use repository::{LoadStatus, OrderRepository};
pub use source::{open_csv, open_gzip_csv, Records, RowResult};
pub use stores::{build_store_index, index_store_rows, RawStoreRow, StoreIndex, STORE_COLUMNS};
