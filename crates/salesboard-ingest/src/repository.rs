//! In-memory home of the merged order set.
//!
//! The set is published as an immutable `Arc<[MergedOrder]>`. Readers clone
//! the `Arc` under a short read lock and then work lock-free, so a reload
//! swaps the whole snapshot at once and nobody sees a half-built set.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use salesboard_core::{query_orders, Clock, DataSources, MergedOrder, SalesPage, SalesQuery};

use crate::error::{IngestError, RepositoryError};
use crate::pipeline::{load_and_merge, LoadOutcome};
use crate::report::LoadReport;

/// Lifecycle of the most recent load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Unloaded,
    Loading,
    Ready,
    Failed(String),
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStatus::Unloaded => write!(f, "unloaded"),
            LoadStatus::Loading => write!(f, "loading"),
            LoadStatus::Ready => write!(f, "ready"),
            LoadStatus::Failed(_) => write!(f, "failed"),
        }
    }
}

#[derive(Debug)]
struct State {
    status: LoadStatus,
    snapshot: Option<Arc<[MergedOrder]>>,
    report: Option<LoadReport>,
}

#[derive(Debug)]
pub struct OrderRepository {
    state: RwLock<State>,
    load_guard: Mutex<()>,
}

impl Default for OrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                status: LoadStatus::Unloaded,
                snapshot: None,
                report: None,
            }),
            load_guard: Mutex::new(()),
        }
    }

    /// Status of the latest load attempt. A failed reload reports
    /// `Failed` while the previous snapshot keeps serving.
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.read_state().status.clone()
    }

    /// `true` once any load has succeeded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.read_state().snapshot.is_some()
    }

    /// Diagnostics from the load that produced the current snapshot.
    #[must_use]
    pub fn last_report(&self) -> Option<LoadReport> {
        self.read_state().report.clone()
    }

    /// The current merged set.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotReady`] if no load has succeeded yet.
    pub fn snapshot(&self) -> Result<Arc<[MergedOrder]>, RepositoryError> {
        let state = self.read_state();
        state
            .snapshot
            .clone()
            .ok_or_else(|| RepositoryError::NotReady {
                status: state.status.clone(),
            })
    }

    /// Runs a sorted, paginated query against the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotReady`] if no load has succeeded yet.
    pub fn query(&self, query: &SalesQuery) -> Result<SalesPage, RepositoryError> {
        let orders = self.snapshot()?;
        Ok(query_orders(&orders, query))
    }

    /// Loads both tables from disk and publishes the result.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] if the load fails; the previous snapshot, if
    /// any, stays in place.
    pub fn load(&self, sources: &DataSources, clock: &dyn Clock) -> Result<LoadReport, IngestError> {
        self.load_with(|| load_and_merge(sources, clock))
    }

    /// Runs `build` and publishes its output on success. Loads are serialized.
    ///
    /// # Errors
    ///
    /// Returns whatever `build` fails with; nothing is published in that case.
    pub fn load_with<F>(&self, build: F) -> Result<LoadReport, IngestError>
    where
        F: FnOnce() -> Result<LoadOutcome, IngestError>,
    {
        let _serialized = self
            .load_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        self.write_state().status = LoadStatus::Loading;

        match build() {
            Ok(LoadOutcome { orders, report }) => {
                let snapshot: Arc<[MergedOrder]> = Arc::from(orders);
                let mut state = self.write_state();
                state.snapshot = Some(snapshot);
                state.report = Some(report.clone());
                state.status = LoadStatus::Ready;
                Ok(report)
            }
            Err(error) => {
                tracing::error!(%error, "order data load failed");
                self.write_state().status = LoadStatus::Failed(error.to_string());
                Err(error)
            }
        }
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
