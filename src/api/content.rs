use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CountDto, IdsRequest, MessageResponse};
use crate::clients::tmdb::MediaKind;
use crate::models::movie::{ContentType, Episode, Movie, Season};
use crate::models::planning::PlanningEntry;
use crate::services::links::{auto_distribute, smart_group_manga};
use crate::services::stats::{DashboardStats, dashboard_stats};
use crate::services::{DistributeReport, DistributeRequest, PublishOutcome};

#[derive(Deserialize)]
pub struct BulkAddRequest {
    pub count: Option<u32>,
    pub from: Option<u32>,
    pub to: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoDistributeRequest {
    pub text: String,
    pub per_episode: usize,
}

#[derive(Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Deserialize)]
pub struct TmdbImportRequest {
    pub kind: String,
    pub id: String,
}

#[derive(Deserialize)]
pub struct MalImportRequest {
    pub id: i64,
}

#[derive(Deserialize)]
pub struct EntryQuery {
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

pub async fn list_content(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Movie>>>, ApiError> {
    Ok(Json(ApiResponse::success(state.content().list().await?)))
}

pub async fn get_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Movie>>, ApiError> {
    Ok(Json(ApiResponse::success(state.content().get(&id).await?)))
}

/// POST /admin/content
/// Validate and save a title; creates it when the id is unknown
pub async fn upsert_content(
    State(state): State<Arc<AppState>>,
    Json(movie): Json<Movie>,
) -> Result<Json<ApiResponse<Movie>>, ApiError> {
    Ok(Json(ApiResponse::success(state.content().upsert(movie).await?)))
}

pub async fn remove_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CountDto>>, ApiError> {
    let count = state.content().remove(&id).await?;
    if count == 0 {
        return Err(ApiError::not_found("Title", id));
    }
    Ok(Json(ApiResponse::success(CountDto { count })))
}

pub async fn remove_many(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IdsRequest>,
) -> Result<Json<ApiResponse<CountDto>>, ApiError> {
    let count = state.content().remove_many(&request.ids).await?;
    Ok(Json(ApiResponse::success(CountDto { count })))
}

pub async fn toggle_pin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Movie>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.content().toggle_pin(&id).await?,
    )))
}

/// POST /admin/content/publish
/// Catalogue item in, published (pinned) or unpublished out
pub async fn toggle_publish(
    State(state): State<Arc<AppState>>,
    Json(movie): Json<Movie>,
) -> Result<Json<ApiResponse<PublishOutcome>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.content().toggle_publish(movie).await?,
    )))
}

pub async fn add_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Season>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.content().add_season(&id).await?,
    )))
}

pub async fn save_episode(
    State(state): State<Arc<AppState>>,
    Path((id, season)): Path<(String, u32)>,
    Json(episode): Json<Episode>,
) -> Result<Json<ApiResponse<Episode>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.content().save_episode(&id, season, episode).await?,
    )))
}

/// POST /admin/content/{id}/seasons/{n}/episodes/bulk
/// Either `count` new episodes, or every missing number in `from..=to`
pub async fn bulk_add(
    State(state): State<Arc<AppState>>,
    Path((id, season)): Path<(String, u32)>,
    Json(request): Json<BulkAddRequest>,
) -> Result<Json<ApiResponse<Vec<Episode>>>, ApiError> {
    let content = state.content();

    let added = match request {
        BulkAddRequest {
            count: Some(count), ..
        } => content.bulk_add_by_count(&id, season, count).await?,
        BulkAddRequest {
            from: Some(from),
            to: Some(to),
            ..
        } => content.bulk_add_by_range(&id, season, from, to).await?,
        _ => {
            return Err(ApiError::validation(
                "Provide either count or both from and to",
            ));
        }
    };

    tracing::info!("Added {} episodes to {} season {}", added.len(), id, season);
    Ok(Json(ApiResponse::success(added)))
}

pub async fn clear_players(
    State(state): State<Arc<AppState>>,
    Path((id, season)): Path<(String, u32)>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.content().clear_season_players(&id, season).await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Players cleared for season {season}"),
    })))
}

pub async fn delete_episodes(
    State(state): State<Arc<AppState>>,
    Path((id, season)): Path<(String, u32)>,
    Json(request): Json<IdsRequest>,
) -> Result<Json<ApiResponse<CountDto>>, ApiError> {
    let count = state
        .content()
        .delete_episodes(&id, season, &request.ids)
        .await?;
    Ok(Json(ApiResponse::success(CountDto { count })))
}

pub async fn sync_season(
    State(state): State<Arc<AppState>>,
    Path((id, season)): Path<(String, u32)>,
) -> Result<Json<ApiResponse<Vec<Episode>>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.content().sync_season(&id, season).await?,
    )))
}

pub async fn distribute_links(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<DistributeRequest>,
) -> Result<Json<ApiResponse<DistributeReport>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.content().distribute_links(&id, request).await?,
    )))
}

pub async fn auto_distribute_text(
    Json(request): Json<AutoDistributeRequest>,
) -> Json<ApiResponse<TextResponse>> {
    Json(ApiResponse::success(TextResponse {
        text: auto_distribute(&request.text, request.per_episode),
    }))
}

pub async fn group_manga_text(
    Json(request): Json<TextRequest>,
) -> Result<Json<ApiResponse<TextResponse>>, ApiError> {
    let text = smart_group_manga(&request.text)
        .ok_or_else(|| ApiError::validation("No chapter number found in these URLs"))?;
    Ok(Json(ApiResponse::success(TextResponse { text })))
}

pub async fn new_planning_entry(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EntryQuery>,
) -> Json<ApiResponse<PlanningEntry>> {
    Json(ApiResponse::success(
        state.content().new_planning_entry(query.content_type),
    ))
}

/// POST /admin/import/tmdb
/// Draft only, nothing is saved until the admin submits it
pub async fn import_tmdb(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TmdbImportRequest>,
) -> Result<Json<ApiResponse<Movie>>, ApiError> {
    let kind = MediaKind::parse(&request.kind)
        .ok_or_else(|| ApiError::validation(format!("Unknown TMDB kind: {}", request.kind)))?;

    Ok(Json(ApiResponse::success(
        state.content().import_tmdb(kind, &request.id).await?,
    )))
}

pub async fn import_mal(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MalImportRequest>,
) -> Result<Json<ApiResponse<Movie>>, ApiError> {
    Ok(Json(ApiResponse::success(
        state.content().import_mal(request.id).await?,
    )))
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError> {
    let managed = state.content().list().await?;
    Ok(Json(ApiResponse::success(dashboard_stats(&managed))))
}
