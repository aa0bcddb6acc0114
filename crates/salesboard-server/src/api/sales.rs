use axum::{
    extract::{Query, State},
    Extension, Json,
};
use salesboard_core::{SalesPage, SalesQuery};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

/// Raw query string. Kept as text so malformed numbers fall back to defaults
/// instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SalesParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortDirection")]
    pub sort_direction: Option<String>,
}

impl SalesParams {
    fn resolve(&self) -> SalesQuery {
        SalesQuery::from_raw(
            self.page.as_deref(),
            self.limit.as_deref(),
            self.sort_direction.as_deref(),
        )
    }
}

pub(super) async fn list_sales(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SalesParams>,
) -> Result<Json<SalesPage>, ApiError> {
    let query = params.resolve();

    let page = state.repository.query(&query).map_err(|e| {
        tracing::warn!(error = %e, "sales data requested before it was available");
        ApiError::new(req_id.0.clone(), "not_ready", "sales data is not available")
    })?;

    tracing::debug!(
        page = query.page,
        limit = query.limit,
        direction = %query.direction,
        returned = page.data.len(),
        "served sales page"
    );

    Ok(Json(page))
}
