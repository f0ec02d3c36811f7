//! Admin dashboard analytics and the "latest episodes" rail.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::constants::limits::{
    LATEST_EPISODE_WINDOW_DAYS, NEW_EPISODE_HOURS, TOP_GENRES, TOP_LANGUAGES, TOP_VIEWED,
};
use crate::models::movie::{Episode, Movie};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_titles: usize,
    pub genres: Vec<Count>,
    pub qualities: Vec<Count>,
    pub languages: Vec<Count>,
    pub top_viewed: Vec<Movie>,
    pub total_views: u64,
    /// Share of published titles, 0 to 100.
    pub health: u32,
}

/// Occurrence counts in first-seen order, most frequent first.
fn tally<'a>(values: impl Iterator<Item = &'a str>) -> Vec<Count> {
    let mut counts: Vec<Count> = Vec::new();

    for value in values.filter(|v| !v.is_empty()) {
        match counts.iter_mut().find(|c| c.name == value) {
            Some(c) => c.count += 1,
            None => counts.push(Count {
                name: value.to_string(),
                count: 1,
            }),
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[must_use]
pub fn dashboard_stats(managed: &[Movie]) -> DashboardStats {
    let mut genres = tally(managed.iter().flat_map(|m| m.genre.iter().map(String::as_str)));
    genres.truncate(TOP_GENRES);

    let qualities = tally(
        managed
            .iter()
            .map(|m| m.video_quality.as_deref().unwrap_or("HD")),
    );

    let mut languages = tally(
        managed
            .iter()
            .flat_map(|m| m.langue.iter().flatten().map(String::as_str)),
    );
    languages.truncate(TOP_LANGUAGES);

    let mut top_viewed = managed.to_vec();
    top_viewed.sort_by(|a, b| b.views.unwrap_or(0).cmp(&a.views.unwrap_or(0)));
    top_viewed.truncate(TOP_VIEWED);

    let published = managed
        .iter()
        .filter(|m| m.status.as_deref().is_none_or(|s| s == "Publish"))
        .count();
    let health = if managed.is_empty() {
        0
    } else {
        u32::try_from((published * 100 + managed.len() / 2) / managed.len()).unwrap_or(100)
    };

    DashboardStats {
        total_titles: managed.len(),
        genres,
        qualities,
        languages,
        top_viewed,
        total_views: managed.iter().filter_map(|m| m.views).sum(),
        health,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEpisode {
    pub series_id: String,
    pub series_title: String,
    pub season_number: u32,
    pub episode: Episode,
    pub language: String,
    pub time_ago: String,
    pub is_new: bool,
    /// Epoch milliseconds, 0 when the episode was never edited.
    pub updated_at: i64,
}

/// French relative label for an edit time, plus whether it is fresh enough
/// for the "new" badge.
#[must_use]
pub fn time_ago(now: DateTime<Utc>, updated_ms: i64) -> (String, bool) {
    if updated_ms == 0 {
        return ("Récemment".to_string(), false);
    }

    let hours = now
        .timestamp_millis()
        .saturating_sub(updated_ms)
        .div_euclid(3_600_000);
    let days = hours.div_euclid(24);

    if hours < 1 {
        ("À l'instant".to_string(), true)
    } else if hours < 24 {
        (format!("Il y a {hours} h"), hours < NEW_EPISODE_HOURS)
    } else if days < 7 {
        (format!("Il y a {days} j"), false)
    } else {
        let label = Utc
            .timestamp_millis_opt(updated_ms)
            .single()
            .map_or_else(String::new, |d| d.format("%d/%m/%Y").to_string());
        (label, false)
    }
}

#[must_use]
pub fn latest_episodes(managed: &[Movie], now: DateTime<Utc>, limit: usize) -> Vec<RecentEpisode> {
    let window_ms = LATEST_EPISODE_WINDOW_DAYS * 24 * 3_600_000;
    let now_ms = now.timestamp_millis();

    let mut recent: Vec<RecentEpisode> = managed
        .iter()
        .filter(|m| m.content_type.is_some_and(|t| t.is_episodic_video()))
        .filter(|m| m.show_in_latest_episodes || m.is_recent_addition)
        .flat_map(|series| {
            series.seasons.iter().flat_map(move |season| {
                season.episodes.iter().filter_map(move |ep| {
                    let updated_at = ep.last_updated.unwrap_or(0);
                    let fresh = updated_at != 0 && now_ms.saturating_sub(updated_at) < window_ms;
                    if !(series.is_recent_addition || fresh) {
                        return None;
                    }

                    let (time_ago, is_new) = time_ago(now, updated_at);
                    let language = ep
                        .langue
                        .first()
                        .or_else(|| series.langue.as_ref().and_then(|l| l.first()))
                        .cloned()
                        .unwrap_or_else(|| "VOSTFR".to_string());

                    Some(RecentEpisode {
                        series_id: series.id.clone(),
                        series_title: series.title.clone(),
                        season_number: season.number,
                        episode: ep.clone(),
                        language,
                        time_ago,
                        is_new,
                        updated_at,
                    })
                })
            })
        })
        .collect();

    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    recent.truncate(limit);
    recent
}
