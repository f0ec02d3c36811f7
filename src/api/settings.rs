use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CountDto, IdsRequest};
use crate::models::settings::{
    AdvancedSettings, Genre, Page, PermalinkSettings, SeoEntry, SeoSettings, SiteSettings,
    SitemapSettings, SliderConfig,
};

pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Genre>>>, ApiError> {
    Ok(Json(ApiResponse::success(state.settings().genres().await?)))
}

pub async fn list_pages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Page>>>, ApiError> {
    Ok(Json(ApiResponse::success(state.settings().pages().await?)))
}

pub async fn list_sliders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<SliderConfig>>>, ApiError> {
    Ok(Json(ApiResponse::success(state.settings().sliders().await?)))
}

/// GET /seo/{page}
/// Query parameters fill the `[placeholder]` slots of the page template.
pub async fn render_seo(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
    Query(vars): Query<BTreeMap<String, String>>,
) -> Result<Json<ApiResponse<SeoEntry>>, ApiError> {
    let entry = state.settings().render_seo(&page, &vars).await?;
    Ok(Json(ApiResponse::success(entry)))
}

// Admin

pub async fn save_genre(
    State(state): State<Arc<AppState>>,
    Json(genre): Json<Genre>,
) -> Result<Json<ApiResponse<Genre>>, ApiError> {
    let saved = state.settings().save_genre(genre).await?;
    tracing::info!("Saved genre {} ({})", saved.name, saved.id);
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn delete_genres(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IdsRequest>,
) -> Result<Json<ApiResponse<CountDto>>, ApiError> {
    let count = state.settings().delete_genres(&request.ids).await?;
    Ok(Json(ApiResponse::success(CountDto { count })))
}

pub async fn save_page(
    State(state): State<Arc<AppState>>,
    Json(page): Json<Page>,
) -> Result<Json<ApiResponse<Page>>, ApiError> {
    let saved = state.settings().save_page(page).await?;
    tracing::info!("Saved page {} ({})", saved.title, saved.id);
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn delete_pages(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IdsRequest>,
) -> Result<Json<ApiResponse<CountDto>>, ApiError> {
    let count = state.settings().delete_pages(&request.ids).await?;
    Ok(Json(ApiResponse::success(CountDto { count })))
}

pub async fn update_slider(
    State(state): State<Arc<AppState>>,
    Json(slider): Json<SliderConfig>,
) -> Result<Json<ApiResponse<SliderConfig>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.settings().update_slider(slider).await?,
    )))
}

pub async fn get_permalinks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PermalinkSettings>>, ApiError> {
    Ok(Json(ApiResponse::success(state.settings().permalinks().await?)))
}

pub async fn set_permalinks(
    State(state): State<Arc<AppState>>,
    Json(value): Json<PermalinkSettings>,
) -> Result<Json<ApiResponse<PermalinkSettings>>, ApiError> {
    let saved = state.settings().set_permalinks(value).await?;
    tracing::info!("Saved permalinks settings");
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn get_advanced(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<AdvancedSettings>>, ApiError> {
    Ok(Json(ApiResponse::success(state.settings().advanced().await?)))
}

pub async fn set_advanced(
    State(state): State<Arc<AppState>>,
    Json(value): Json<AdvancedSettings>,
) -> Result<Json<ApiResponse<AdvancedSettings>>, ApiError> {
    let saved = state.settings().set_advanced(value).await?;
    tracing::info!("Saved advanced settings");
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn get_site(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SiteSettings>>, ApiError> {
    Ok(Json(ApiResponse::success(state.settings().site().await?)))
}

pub async fn set_site(
    State(state): State<Arc<AppState>>,
    Json(value): Json<SiteSettings>,
) -> Result<Json<ApiResponse<SiteSettings>>, ApiError> {
    let saved = state.settings().set_site(value).await?;
    tracing::info!("Saved site settings");
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn get_seo(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SeoSettings>>, ApiError> {
    Ok(Json(ApiResponse::success(state.settings().seo().await?)))
}

pub async fn set_seo(
    State(state): State<Arc<AppState>>,
    Json(value): Json<SeoSettings>,
) -> Result<Json<ApiResponse<SeoSettings>>, ApiError> {
    let saved = state.settings().set_seo(value).await?;
    tracing::info!("Saved seo settings");
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn get_sitemap(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SitemapSettings>>, ApiError> {
    Ok(Json(ApiResponse::success(state.settings().sitemap().await?)))
}

pub async fn set_sitemap(
    State(state): State<Arc<AppState>>,
    Json(value): Json<SitemapSettings>,
) -> Result<Json<ApiResponse<SitemapSettings>>, ApiError> {
    let saved = state.settings().set_sitemap(value).await?;
    tracing::info!("Saved sitemap settings");
    Ok(Json(ApiResponse::success(saved)))
}
