use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::{PlanningBoard, PlanningFilter, PlanningProjector};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct PlanningQuery {
    pub filter: Option<String>,
    /// Weeks away from the current one, negative for the past.
    pub week: i64,
    pub search: Option<String>,
}

/// GET /planning
pub async fn get_planning(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlanningQuery>,
) -> Result<Json<ApiResponse<PlanningBoard>>, ApiError> {
    let filter = match query.filter.as_deref() {
        None => PlanningFilter::default(),
        Some(raw) => PlanningFilter::parse(raw)
            .ok_or_else(|| ApiError::validation(format!("Unknown planning filter: {raw}")))?,
    };

    let managed = state.content().list().await?;
    let projector = PlanningProjector::new(
        Local::now().date_naive(),
        state.config().planning.fallback_total_episodes,
    );

    let board = projector
        .board(&managed, query.week, filter, query.search.as_deref())
        .ok_or_else(|| ApiError::validation(format!("Week offset out of range: {}", query.week)))?;
    Ok(Json(ApiResponse::success(board)))
}
