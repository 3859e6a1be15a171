//! Sustainability dashboard endpoints
//!
//! Catalog-wide carbon statistics, per-urgency region rankings and analytics
//! over the recorded job history.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use crate::carbon_aware::{CatalogOverview, RegionScore, SchedulingService, Urgency};
use crate::history::Analytics;

use super::dto::RankingQuery;
use super::handlers::{api_error, ApiError};

/// Routes mounted under `/api/v1`
pub fn sustainability_router() -> Router<Arc<SchedulingService>> {
    Router::new()
        .route("/regions/overview", get(get_overview))
        .route("/regions/ranking", get(get_ranking))
        .route("/analytics", get(get_analytics))
}

#[instrument(skip(state))]
pub async fn get_overview(
    State(state): State<Arc<SchedulingService>>,
) -> Result<Json<CatalogOverview>, ApiError> {
    state.overview().await.map(Json).map_err(|e| api_error(&e))
}

#[instrument(skip(state))]
pub async fn get_ranking(
    State(state): State<Arc<SchedulingService>>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<Vec<RegionScore>>, ApiError> {
    let urgency = match query.urgency.as_deref() {
        Some(value) => value.parse::<Urgency>().map_err(|e| api_error(&e))?,
        None => Urgency::Medium,
    };
    debug!("Ranking catalog for {} urgency", urgency);

    state
        .ranking(urgency)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

#[instrument(skip(state))]
pub async fn get_analytics(State(state): State<Arc<SchedulingService>>) -> Json<Analytics> {
    let records = state.history().list_chronological().await;
    Json(Analytics::from_records(&records))
}
