use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, BootstrapDto};
use crate::models::movie::{ContentType, Episode, Movie};
use crate::services::stats::{RecentEpisode, latest_episodes};
use crate::services::{CatalogueFilters, View, ViewPage};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct BootstrapQuery {
    pub view: Option<String>,
    pub admin: Option<String>,
}

impl BootstrapQuery {
    fn initial_view(&self) -> &'static str {
        let admin_view = self.view.as_deref() == Some("admin");
        let admin_flag = self.admin.as_deref() == Some("true");

        if admin_view || admin_flag { "admin" } else { "home" }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ListingQuery {
    pub view: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub search: Option<String>,
    /// Client-chosen id (one per tab) that keys the latest-request guard.
    pub scope: Option<String>,
}

impl ListingQuery {
    fn scope(&self) -> Option<&str> {
        self.scope.as_deref().filter(|s| !s.is_empty())
    }

    fn filters(&self) -> CatalogueFilters {
        CatalogueFilters {
            content_type: self.content_type.clone(),
            genre: self.genre.clone(),
            language: self.language.clone(),
            search: self.search.clone(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SnapshotQuery {
    pub view: Option<String>,
    pub scope: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct TitleQuery {
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// GET /bootstrap
pub async fn bootstrap(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BootstrapQuery>,
) -> Result<Json<ApiResponse<BootstrapDto>>, ApiError> {
    let settings = state.settings();

    Ok(Json(ApiResponse::success(BootstrapDto {
        initial_view: query.initial_view(),
        site: settings.site().await?,
        genres: settings.genres().await?,
        pages: settings.pages().await?,
        sliders: settings.sliders().await?,
        adblock: settings.adblock().await?,
    })))
}

/// GET /home
/// `view` picks one of the home tabs, defaults to the mixed home page.
pub async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ApiResponse<ViewPage>>, ApiError> {
    let view = match query.view.as_deref() {
        None | Some("") => View::Home,
        Some(raw) => View::parse(raw)
            .filter(|v| {
                matches!(
                    v,
                    View::Home | View::HomeMovies | View::HomeSeries | View::HomeManga
                )
            })
            .ok_or_else(|| ApiError::validation(format!("Unknown home view: {raw}")))?,
    };

    let page = state
        .catalogue()
        .load_view(view, &query.filters(), query.page.unwrap_or(1), query.scope())
        .await?;

    Ok(Json(ApiResponse::success(page)))
}

fn catalogue_view(filters: &CatalogueFilters) -> View {
    if filters.search_text().is_some() {
        View::Search
    } else if filters.genre_text().is_some() {
        View::Genre
    } else {
        View::Catalogue
    }
}

/// GET /catalogue
pub async fn catalogue(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ApiResponse<ViewPage>>, ApiError> {
    let filters = query.filters();
    let view = catalogue_view(&filters);

    let page = state
        .catalogue()
        .load_view(view, &filters, query.page.unwrap_or(1), query.scope())
        .await?;

    Ok(Json(ApiResponse::success(page)))
}

/// GET /catalogue/snapshot
/// Last listing kept for `scope` and `view` by the latest-request guard.
pub async fn snapshot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
) -> Result<Json<ApiResponse<Vec<Movie>>>, ApiError> {
    let scope = query
        .scope
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("scope is required"))?;
    let raw = query.view.as_deref().unwrap_or("home");
    let view =
        View::parse(raw).ok_or_else(|| ApiError::validation(format!("Unknown view: {raw}")))?;

    let movies = state
        .catalogue()
        .snapshot(scope, view)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("No listing kept for {raw} in {scope}")))?;

    Ok(Json(ApiResponse::success(movies)))
}

/// GET /catalogue/random
pub async fn random(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<CatalogueFilters>,
) -> Result<Json<ApiResponse<Movie>>, ApiError> {
    let movie = state
        .catalogue()
        .random(&filters)
        .await?
        .ok_or_else(|| ApiError::NotFound("No title matches these filters".to_string()))?;

    Ok(Json(ApiResponse::success(movie)))
}

/// GET /titles/{id}
pub async fn title_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<TitleQuery>,
) -> Result<Json<ApiResponse<Movie>>, ApiError> {
    let movie = state.catalogue().detail(&id, query.content_type).await?;
    Ok(Json(ApiResponse::success(movie)))
}

/// GET /titles/{id}/recommendations
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<TitleQuery>,
) -> Json<ApiResponse<Vec<Movie>>> {
    let is_series = query.content_type.is_some_and(ContentType::is_episodic_video);
    let movies = state.catalogue().recommendations(&id, is_series).await;
    Json(ApiResponse::success(movies))
}

/// GET /titles/{id}/seasons/{n}/episodes
pub async fn season_episodes(
    State(state): State<Arc<AppState>>,
    Path((id, season)): Path<(String, u32)>,
) -> Result<Json<ApiResponse<Vec<Episode>>>, ApiError> {
    let episodes = state.catalogue().season_episodes(&id, season).await?;
    Ok(Json(ApiResponse::success(episodes)))
}

/// GET /latest-episodes
pub async fn latest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<RecentEpisode>>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(state.config().catalogue.latest_episodes_limit);
    let managed = state.content().list().await?;

    Ok(Json(ApiResponse::success(latest_episodes(
        &managed,
        Utc::now(),
        limit,
    ))))
}
