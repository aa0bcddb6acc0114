pub mod app_config;
pub mod config;
pub mod orders;
pub mod overdue;
pub mod query;

use thiserror::Error;

pub use app_config::{AppConfig, DataSources, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use orders::{MergedOrder, StoreRecord, PENDING_STATUS};
pub use overdue::{days_overdue, parse_ship_date, Clock, FixedClock, SystemClock};
pub use query::{query_orders, SalesPage, SalesQuery, SortDirection, DEFAULT_LIMIT, DEFAULT_PAGE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("malformed date \"{input}\": {reason}")]
    Malformed { input: String, reason: String },
}
