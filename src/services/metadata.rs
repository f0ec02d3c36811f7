//! Remote catalogue metadata.
//!
//! [`MetadataSource`] is what the rest of the crate talks to. Listing and
//! detail lookups never fail: errors are logged and turned into an empty list
//! or the unchanged input record. Only the admin importers report errors.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{error, warn};

use crate::clients::jikan::JikanClient;
use crate::clients::tmdb::{MediaKind, TmdbClient, apply_details};
use crate::constants::limits::{MANGA_MOCK_CHAPTERS, RECOMMENDATIONS};
use crate::constants::placeholders::POSTER_FALLBACK;
use crate::models::movie::{ContentType, Episode, Movie};

#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Listing for a free-form query such as "top rated series".
    async fn fetch(&self, query: &str, count: usize, page: u32) -> Vec<Movie>;

    async fn search(&self, query: &str, page: u32) -> Vec<Movie>;

    /// Enriches a record with cast, director, trailer and seasons.
    async fn details(&self, movie: &Movie) -> Movie;

    async fn season_episodes(&self, series_id: &str, season_number: u32) -> Vec<Episode>;

    async fn recommendations(&self, id: &str, is_series: bool) -> Vec<Movie>;

    async fn import_tmdb(&self, kind: MediaKind, id: &str) -> anyhow::Result<Option<Movie>>;

    async fn import_mal(&self, mal_id: i64) -> anyhow::Result<Option<Movie>>;
}

/// Which provider endpoint a free-form listing query maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRoute {
    /// Jikan manga search; an empty query means the top list.
    Manga(String),
    Tmdb(&'static str),
}

fn manga_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)manga").expect("Invalid regex"))
}

#[must_use]
pub fn route_query(query: &str) -> QueryRoute {
    let lowered = query.to_lowercase();

    if lowered.contains("manga") {
        return QueryRoute::Manga(manga_word().replace_all(query, "").trim().to_string());
    }

    if lowered.contains("series") || lowered.contains("séries") {
        if lowered.contains("top") {
            QueryRoute::Tmdb("/tv/top_rated")
        } else {
            QueryRoute::Tmdb("/tv/popular")
        }
    } else if lowered.contains("movies") || lowered.contains("films") {
        if lowered.contains("box office") {
            QueryRoute::Tmdb("/movie/now_playing")
        } else {
            QueryRoute::Tmdb("/movie/popular")
        }
    } else {
        QueryRoute::Tmdb("/trending/all/day")
    }
}

/// Placeholder chapter list for manga, which has no chapter API.
#[must_use]
pub fn mock_manga_chapters(series_id: &str) -> Vec<Episode> {
    let released = chrono::Utc::now().to_rfc3339();

    (1..=MANGA_MOCK_CHAPTERS)
        .map(|n| Episode {
            id: format!("chapter-{series_id}-{n}"),
            number: n,
            title: format!("Chapitre {n}"),
            overview: Some("Contenu du scan manga.".to_string()),
            thumbnail_url: format!("{POSTER_FALLBACK}/{series_id}-{}/500/280", n - 1),
            release_date: Some(released.clone()),
            ..Default::default()
        })
        .collect()
}

pub struct RemoteMetadata {
    tmdb: TmdbClient,
    jikan: JikanClient,
}

impl RemoteMetadata {
    #[must_use]
    pub const fn new(tmdb: TmdbClient, jikan: JikanClient) -> Self {
        Self { tmdb, jikan }
    }

    async fn fetch_manga(&self, query: &str, page: u32) -> Vec<Movie> {
        let result = if query.is_empty() {
            self.jikan.top_manga(page).await
        } else {
            self.jikan.search_manga(query, page).await
        };

        match result {
            Ok(items) => items.iter().map(|m| m.to_movie()).collect(),
            Err(e) => {
                error!("Jikan manga fetch failed: {}", e);
                Vec::new()
            }
        }
    }

    fn to_movies<'a>(
        &self,
        items: impl Iterator<Item = &'a crate::clients::tmdb::TmdbItem>,
    ) -> Vec<Movie> {
        items
            .filter_map(|item| item.to_movie(self.tmdb.image_base_url()))
            .collect()
    }
}

#[async_trait]
impl MetadataSource for RemoteMetadata {
    async fn fetch(&self, query: &str, count: usize, page: u32) -> Vec<Movie> {
        match route_query(query) {
            QueryRoute::Manga(q) => self.fetch_manga(&q, page).await,
            QueryRoute::Tmdb(endpoint) => match self.tmdb.list(endpoint, page).await {
                Ok(items) => self.to_movies(items.iter().take(count)),
                Err(e) => {
                    error!("TMDB fetch failed for {}: {}", endpoint, e);
                    Vec::new()
                }
            },
        }
    }

    async fn search(&self, query: &str, page: u32) -> Vec<Movie> {
        if let QueryRoute::Manga(q) = route_query(query) {
            return self.fetch_manga(&q, page).await;
        }

        match self.tmdb.search_multi(query, page).await {
            Ok(items) => self.to_movies(items.iter()),
            Err(e) => {
                error!("TMDB search failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn details(&self, movie: &Movie) -> Movie {
        if movie.is_type(ContentType::Manga) {
            return movie.clone();
        }

        let Some(id) = movie.identity().map(str::to_string) else {
            return movie.clone();
        };
        let kind = MediaKind::for_movie(movie);

        let (details, credits, videos) = tokio::join!(
            self.tmdb.details(kind, &id),
            self.tmdb.credits(kind, &id),
            self.tmdb.videos(kind, &id)
        );

        let (details, credits, videos) = match (details, credits, videos) {
            (Ok(d), Ok(c), Ok(v)) => (d, c, v),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                error!("Details fetch failed for {}: {}", id, e);
                return movie.clone();
            }
        };

        let mut detailed = apply_details(
            movie,
            kind,
            &details,
            &credits,
            &videos,
            self.tmdb.image_base_url(),
        );

        if kind == MediaKind::Tv {
            let first = detailed
                .seasons
                .iter()
                .position(|s| s.number == 1)
                .or_else(|| (!detailed.seasons.is_empty()).then_some(0));

            if let Some(idx) = first
                && detailed.seasons[idx].episodes.is_empty()
            {
                let number = detailed.seasons[idx].number;
                match self.tmdb.season(&id, number).await {
                    Ok(season) => {
                        detailed.seasons[idx].episodes = season
                            .episodes
                            .iter()
                            .map(|ep| ep.to_episode(self.tmdb.image_base_url()))
                            .collect();
                    }
                    Err(e) => warn!("Auto-fetch of season {} for {} failed: {}", number, id, e),
                }
            }
        }

        detailed
    }

    async fn season_episodes(&self, series_id: &str, season_number: u32) -> Vec<Episode> {
        if series_id.starts_with("manga-") {
            return mock_manga_chapters(series_id);
        }

        match self.tmdb.season(series_id, season_number).await {
            Ok(season) => season
                .episodes
                .iter()
                .map(|ep| ep.to_episode(self.tmdb.image_base_url()))
                .collect(),
            Err(e) => {
                error!(
                    "TMDB season {} episodes failed for {}: {}",
                    season_number, series_id, e
                );
                Vec::new()
            }
        }
    }

    async fn recommendations(&self, id: &str, is_series: bool) -> Vec<Movie> {
        let kind = if is_series {
            MediaKind::Tv
        } else {
            MediaKind::Movie
        };

        match self.tmdb.recommendations(kind, id).await {
            Ok(items) => self.to_movies(items.iter().take(RECOMMENDATIONS)),
            Err(e) => {
                error!("TMDB recommendations failed for {}: {}", id, e);
                Vec::new()
            }
        }
    }

    async fn import_tmdb(&self, kind: MediaKind, id: &str) -> anyhow::Result<Option<Movie>> {
        let details = self.tmdb.details(kind, id).await?;
        Ok(details.to_draft(kind, self.tmdb.image_base_url()))
    }

    async fn import_mal(&self, mal_id: i64) -> anyhow::Result<Option<Movie>> {
        Ok(self.jikan.get_manga(mal_id).await?.map(|m| m.to_draft()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_query() {
        assert_eq!(
            route_query("manga popular scans 2024"),
            QueryRoute::Manga("popular scans 2024".to_string())
        );
        assert_eq!(route_query("top MANGA mal"), QueryRoute::Manga("top  mal".to_string()));
        assert_eq!(route_query("Manga"), QueryRoute::Manga(String::new()));
        assert_eq!(
            route_query("séries tv populaires 2024 streaming"),
            QueryRoute::Tmdb("/tv/popular")
        );
        assert_eq!(
            route_query("top rated tv series tmdb"),
            QueryRoute::Tmdb("/tv/top_rated")
        );
        assert_eq!(
            route_query("films populaires cinema 2024"),
            QueryRoute::Tmdb("/movie/popular")
        );
        assert_eq!(
            route_query("trending movies box office"),
            QueryRoute::Tmdb("/movie/now_playing")
        );
        assert_eq!(
            route_query("trending movies 2024"),
            QueryRoute::Tmdb("/movie/popular")
        );
        assert_eq!(
            route_query("box office hits all time"),
            QueryRoute::Tmdb("/trending/all/day")
        );
    }

    #[test]
    fn test_mock_manga_chapters() {
        let chapters = mock_manga_chapters("manga-2");
        assert_eq!(chapters.len(), 12);
        assert_eq!(chapters[0].id, "chapter-manga-2-1");
        assert_eq!(chapters[11].title, "Chapitre 12");
        assert_eq!(
            chapters[0].thumbnail_url,
            "https://picsum.photos/seed/manga-2-0/500/280"
        );
    }
}
