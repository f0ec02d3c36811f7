//! Domain service for the managed catalogue.
//!
//! Covers titles, their seasons and episodes, and the provider importers
//! used by the admin editor.

use serde::Serialize;
use thiserror::Error;

use crate::clients::tmdb::MediaKind;
use crate::models::movie::{ContentType, Episode, Movie, Season};
use crate::models::planning::PlanningEntry;
use crate::services::links::{DistributeReport, DistributeRequest};
use crate::services::slug::slugify;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Title not found: {0}")]
    NotFound(String),

    #[error("Season {season} not found for {series}")]
    SeasonNotFound { series: String, season: u32 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<anyhow::Error> for ContentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Import(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum PublishOutcome {
    Removed { id: String },
    Added { movie: Box<Movie> },
}

/// New random identifier for admin-created records.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[must_use]
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Episode label prefix for a title type.
#[must_use]
pub fn episode_word(content_type: Option<ContentType>) -> &'static str {
    if content_type == Some(ContentType::Manga) {
        "Chapitre"
    } else {
        "Episode"
    }
}

/// Blank episode as created by the bulk tools.
#[must_use]
pub fn blank_episode(content_type: Option<ContentType>, number: u32, now: i64) -> Episode {
    Episode {
        id: new_id(),
        number,
        title: format!("{} {number}", episode_word(content_type)),
        langue: vec!["VF".to_string()],
        slug: Some(slugify(&format!("episode {number}"))),
        last_updated: Some(now),
        ..Default::default()
    }
}

fn check_episode_media(
    content_type: ContentType,
    season: &Season,
    episode: &Episode,
) -> Result<(), ContentError> {
    if content_type == ContentType::Manga && !episode.videos.is_empty() {
        return Err(ContentError::Validation(format!(
            "Chapter {} of season {} carries video sources",
            episode.number, season.number
        )));
    }
    if content_type != ContentType::Manga && !episode.images.is_empty() {
        return Err(ContentError::Validation(format!(
            "Episode {} of season {} carries scan images",
            episode.number, season.number
        )));
    }
    Ok(())
}

/// Checks a title submitted from the editor and fills in generated fields.
pub fn validate_movie(mut movie: Movie) -> Result<Movie, ContentError> {
    let Some(content_type) = movie.content_type else {
        return Err(ContentError::Validation("type is required".to_string()));
    };

    movie.title = movie.title.trim().to_string();
    if movie.title.is_empty() {
        return Err(ContentError::Validation("title is required".to_string()));
    }

    if movie.id.trim().is_empty() {
        movie.id = movie
            .tmdb_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(new_id);
    }

    let monthly = content_type == ContentType::Movie;
    if let Some(entry) = movie
        .planning_entries
        .iter()
        .find(|e| e.is_weekly() == monthly)
    {
        let expected = if monthly { "monthly" } else { "weekly" };
        return Err(ContentError::Validation(format!(
            "{} titles only take {expected} planning entries, got {entry:?}",
            content_type.as_str()
        )));
    }

    for season in &movie.seasons {
        for episode in &season.episodes {
            check_episode_media(content_type, season, episode)?;
        }
    }

    if movie.slug.as_deref().is_none_or(str::is_empty) {
        movie.slug = Some(slugify(&movie.title));
    }

    Ok(movie)
}

/// Validates an episode against its parent title type.
pub fn validate_episode(
    content_type: Option<ContentType>,
    season: &Season,
    episode: &Episode,
) -> Result<(), ContentError> {
    match content_type {
        Some(ct) => check_episode_media(ct, season, episode),
        None => Ok(()),
    }
}

/// Domain service trait for managed content.
#[async_trait::async_trait]
pub trait ContentService: Send + Sync {
    async fn list(&self) -> Result<Vec<Movie>, ContentError>;

    /// Looks a title up by `id` or `tmdbId`.
    async fn get(&self, id: &str) -> Result<Movie, ContentError>;

    /// Validates and stores a title, replacing the record for the same title
    /// or inserting it at the front.
    async fn upsert(&self, movie: Movie) -> Result<Movie, ContentError>;

    /// Returns the number of records removed.
    async fn remove(&self, id: &str) -> Result<usize, ContentError>;

    async fn remove_many(&self, ids: &[String]) -> Result<usize, ContentError>;

    async fn toggle_pin(&self, id: &str) -> Result<Movie, ContentError>;

    /// Removes a published title, or fetches its details and publishes it
    /// pinned.
    async fn toggle_publish(&self, movie: Movie) -> Result<PublishOutcome, ContentError>;

    async fn add_season(&self, series_id: &str) -> Result<Season, ContentError>;

    async fn save_episode(
        &self,
        series_id: &str,
        season_number: u32,
        episode: Episode,
    ) -> Result<Episode, ContentError>;

    async fn bulk_add_by_count(
        &self,
        series_id: &str,
        season_number: u32,
        count: u32,
    ) -> Result<Vec<Episode>, ContentError>;

    async fn bulk_add_by_range(
        &self,
        series_id: &str,
        season_number: u32,
        from: u32,
        to: u32,
    ) -> Result<Vec<Episode>, ContentError>;

    /// Empties the players and scan images of every episode in a season.
    async fn clear_season_players(
        &self,
        series_id: &str,
        season_number: u32,
    ) -> Result<(), ContentError>;

    async fn delete_episodes(
        &self,
        series_id: &str,
        season_number: u32,
        episode_ids: &[String],
    ) -> Result<usize, ContentError>;

    async fn distribute_links(
        &self,
        series_id: &str,
        request: DistributeRequest,
    ) -> Result<DistributeReport, ContentError>;

    /// Replaces a season's episodes with the provider listing.
    async fn sync_season(
        &self,
        series_id: &str,
        season_number: u32,
    ) -> Result<Vec<Episode>, ContentError>;

    fn new_planning_entry(&self, content_type: ContentType) -> PlanningEntry {
        PlanningEntry::default_for(content_type)
    }

    async fn import_tmdb(&self, kind: MediaKind, id: &str) -> Result<Movie, ContentError>;

    async fn import_mal(&self, mal_id: i64) -> Result<Movie, ContentError>;
}
