use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::models::settings::{AdBlockNotice, AdZoneConfig, AdsConfig};
use crate::services::ads::{render_html, resolve_zone};
use crate::services::{AdSlot, Viewport};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ViewportQuery {
    pub viewport: Option<String>,
    /// Client width in pixels, compared against the mobile breakpoint.
    pub width: Option<u32>,
}

impl ViewportQuery {
    fn resolve(&self, breakpoint: u32) -> Result<Viewport, ApiError> {
        if let Some(raw) = self.viewport.as_deref() {
            return Viewport::parse(raw)
                .ok_or_else(|| ApiError::validation(format!("Unknown viewport: {raw}")));
        }

        Ok(self
            .width
            .map_or(Viewport::Desktop, |w| Viewport::from_width(w, breakpoint)))
    }
}

async fn slot_for(state: &AppState, zone: &str, query: &ViewportQuery) -> Result<AdSlot, ApiError> {
    let viewport = query.resolve(state.config().ads.mobile_breakpoint_px)?;
    let ads = state.settings().ads().await?;
    Ok(resolve_zone(zone, &ads, viewport))
}

/// GET /ads/{zone}
pub async fn get_slot(
    State(state): State<Arc<AppState>>,
    Path(zone): Path<String>,
    Query(query): Query<ViewportQuery>,
) -> Result<Json<ApiResponse<AdSlot>>, ApiError> {
    let slot = slot_for(&state, &zone, &query).await?;
    Ok(Json(ApiResponse::success(slot)))
}

/// GET /ads/{zone}/html
pub async fn get_slot_html(
    State(state): State<Arc<AppState>>,
    Path(zone): Path<String>,
    Query(query): Query<ViewportQuery>,
) -> Result<Html<String>, ApiError> {
    let slot = slot_for(&state, &zone, &query).await?;
    Ok(Html(render_html(&slot)))
}

pub async fn get_adblock(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<AdBlockNotice>>, ApiError> {
    Ok(Json(ApiResponse::success(state.settings().adblock().await?)))
}

// Admin

pub async fn get_ads(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<AdsConfig>>, ApiError> {
    Ok(Json(ApiResponse::success(state.settings().ads().await?)))
}

pub async fn replace_ads(
    State(state): State<Arc<AppState>>,
    Json(ads): Json<AdsConfig>,
) -> Result<Json<ApiResponse<AdsConfig>>, ApiError> {
    let saved = state.settings().replace_ads(ads).await?;
    tracing::info!("Ad configuration replaced ({} zones)", saved.0.len());
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn update_zone(
    State(state): State<Arc<AppState>>,
    Path(zone): Path<String>,
    Json(config): Json<AdZoneConfig>,
) -> Result<Json<ApiResponse<AdZoneConfig>>, ApiError> {
    let saved = state.settings().update_zone(&zone, config).await?;
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn toggle_zone(
    State(state): State<Arc<AppState>>,
    Path(zone): Path<String>,
) -> Result<Json<ApiResponse<AdZoneConfig>>, ApiError> {
    let saved = state.settings().toggle_zone(&zone).await?;
    tracing::info!(zone = %zone, enabled = saved.enabled, "Ad zone toggled");
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn clear_zone(
    State(state): State<Arc<AppState>>,
    Path(zone): Path<String>,
) -> Result<Json<ApiResponse<AdZoneConfig>>, ApiError> {
    let saved = state.settings().clear_zone(&zone).await?;
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn set_adblock(
    State(state): State<Arc<AppState>>,
    Json(notice): Json<AdBlockNotice>,
) -> Result<Json<ApiResponse<AdBlockNotice>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.settings().set_adblock(notice).await?,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_query() {
        let query = |viewport: Option<&str>, width: Option<u32>| ViewportQuery {
            viewport: viewport.map(str::to_string),
            width,
        };

        assert_eq!(query(None, None).resolve(768).unwrap(), Viewport::Desktop);
        assert_eq!(query(None, Some(400)).resolve(768).unwrap(), Viewport::Mobile);
        assert_eq!(query(None, Some(768)).resolve(768).unwrap(), Viewport::Desktop);
        assert_eq!(
            query(Some("Mobile"), Some(1200)).resolve(768).unwrap(),
            Viewport::Mobile
        );
        assert!(query(Some("tablet"), None).resolve(768).is_err());
    }
}
