use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::TmdbConfig;
use crate::constants::placeholders::POSTER_FALLBACK;
use crate::models::movie::{ContentType, Episode, Movie, Season};
use crate::services::slug::slugify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "movie" | "film" => Some(Self::Movie),
            "tv" | "series" | "serie" | "anime" => Some(Self::Tv),
            _ => None,
        }
    }

    /// Endpoint family a catalogue record is looked up under.
    #[must_use]
    pub fn for_movie(movie: &Movie) -> Self {
        match movie.content_type {
            Some(ct) if ct.is_episodic_video() => Self::Tv,
            _ => Self::Movie,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Paged<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbItem {
    pub id: Option<i64>,
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f64>,
    pub runtime: Option<u32>,
    pub genre_ids: Option<Vec<i64>>,
    pub genres: Option<Vec<TmdbGenre>>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub popularity: Option<f64>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

impl TmdbItem {
    #[must_use]
    pub fn is_series(&self) -> bool {
        self.media_type.as_deref() == Some("tv")
            || non_empty(self.first_air_date.as_deref()).is_some()
            || non_empty(self.name.as_deref()).is_some()
    }

    fn start_year(&self) -> i32 {
        non_empty(self.release_date.as_deref())
            .or_else(|| non_empty(self.first_air_date.as_deref()))
            .and_then(|date| date.split('-').next())
            .and_then(|year| year.parse::<i32>().ok())
            .filter(|year| *year != 0)
            .unwrap_or(2024)
    }

    /// Normalizes a listing/search/recommendation result. Returns `None` for
    /// results without an id.
    #[must_use]
    pub fn to_movie(&self, image_base_url: &str) -> Option<Movie> {
        let id = self.id?.to_string();
        let series = self.is_series();

        let genre: Vec<String> = if self.genre_ids.is_some() {
            Vec::new()
        } else {
            self.genres
                .iter()
                .flatten()
                .map(|g| g.name.clone())
                .collect()
        };

        let title = non_empty(self.title.as_deref())
            .or_else(|| non_empty(self.name.as_deref()))
            .unwrap_or("Sans titre")
            .to_string();

        let duration = if series {
            "Saison 1".to_string()
        } else {
            self.runtime
                .filter(|r| *r > 0)
                .map_or_else(|| "2h 10m".to_string(), format_runtime)
        };

        Some(Movie {
            tmdb_id: Some(id.clone()),
            title,
            year: self.start_year(),
            rating: format!("{:.1}", self.vote_average.unwrap_or(0.0)),
            duration,
            genre: if genre.is_empty() {
                vec!["Action".to_string(), "Drame".to_string()]
            } else {
                genre
            },
            description: non_empty(self.overview.as_deref())
                .unwrap_or("Aucun synopsis disponible pour le moment.")
                .to_string(),
            poster_url: image_url(image_base_url, "w500", self.poster_path.as_deref())
                .unwrap_or_else(|| format!("{POSTER_FALLBACK}/{id}/500/750")),
            backdrop_url: image_url(image_base_url, "original", self.backdrop_path.as_deref())
                .unwrap_or_else(|| format!("{POSTER_FALLBACK}/{id}/1200/600")),
            director: "Production TMDB".to_string(),
            popularity: self.popularity.unwrap_or(0.0).round(),
            content_type: Some(if series {
                ContentType::Series
            } else {
                ContentType::Movie
            }),
            episode: series.then(|| "Épisode 1".to_string()),
            season: series.then_some(1),
            id,
            ..Default::default()
        })
    }
}

#[must_use]
pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn image_url(base: &str, size: &str, path: Option<&str>) -> Option<String> {
    non_empty(path).map(|p| format!("{base}/{size}{p}"))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbSeasonSummary {
    pub id: Option<i64>,
    pub season_number: u32,
    pub name: Option<String>,
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbDetails {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub original_title: Option<String>,
    pub original_name: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub genres: Option<Vec<TmdbGenre>>,
    pub runtime: Option<u32>,
    pub episode_run_time: Option<Vec<u32>>,
    pub number_of_seasons: Option<u32>,
    pub created_by: Option<Vec<Named>>,
    pub seasons: Option<Vec<TmdbSeasonSummary>>,
}

impl TmdbDetails {
    /// Unsaved admin draft for a title looked up by id.
    #[must_use]
    pub fn to_draft(&self, kind: MediaKind, image_base_url: &str) -> Option<Movie> {
        let id = self.id?.to_string();
        let title = non_empty(self.title.as_deref())
            .or_else(|| non_empty(self.name.as_deref()))
            .unwrap_or_default()
            .to_string();
        let release_date = non_empty(self.release_date.as_deref())
            .or_else(|| non_empty(self.first_air_date.as_deref()))
            .map(str::to_string);
        let runtime = self
            .runtime
            .or_else(|| self.episode_run_time.as_ref().and_then(|r| r.first().copied()));

        Some(Movie {
            tmdb_id: Some(id.clone()),
            alt_title: non_empty(self.original_title.as_deref())
                .or_else(|| non_empty(self.original_name.as_deref()))
                .map(str::to_string),
            description: self.overview.clone().unwrap_or_default(),
            year: release_date
                .as_deref()
                .and_then(|d| d.split('-').next())
                .and_then(|y| y.parse().ok())
                .filter(|y| *y != 0)
                .unwrap_or(2024),
            release_date,
            rating: format!("{:.1}", self.vote_average.unwrap_or(0.0)),
            duration: runtime.map(format_runtime).unwrap_or_default(),
            poster_url: image_url(image_base_url, "w500", self.poster_path.as_deref())
                .unwrap_or_default(),
            backdrop_url: image_url(image_base_url, "original", self.backdrop_path.as_deref())
                .unwrap_or_default(),
            genre: self
                .genres
                .iter()
                .flatten()
                .map(|g| g.name.clone())
                .collect(),
            langue: Some(vec!["VF".to_string()]),
            content_type: Some(match kind {
                MediaKind::Movie => ContentType::Movie,
                MediaKind::Tv => ContentType::Series,
            }),
            status: Some("Publish".to_string()),
            seasons: self
                .seasons
                .iter()
                .flatten()
                .map(|s| {
                    let season_title = non_empty(s.name.as_deref())
                        .map_or_else(|| format!("Season {}", s.season_number), str::to_string);
                    Season {
                        id: s.id.map(|id| id.to_string()).unwrap_or_default(),
                        number: s.season_number,
                        slug: Some(slugify(&season_title)),
                        title: season_title,
                        ..Default::default()
                    }
                })
                .collect(),
            slug: Some(slugify(&title)),
            title,
            id,
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbCredits {
    pub cast: Vec<Named>,
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub key: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbVideos {
    pub results: Vec<TmdbVideo>,
}

impl TmdbVideos {
    /// First YouTube trailer or teaser, as an embeddable URL.
    #[must_use]
    pub fn trailer_embed_url(&self) -> Option<String> {
        self.results
            .iter()
            .find(|v| v.site == "YouTube" && (v.kind == "Trailer" || v.kind == "Teaser"))
            .map(|v| format!("https://www.youtube.com/embed/{}", v.key))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbEpisode {
    pub id: Option<i64>,
    pub episode_number: u32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub still_path: Option<String>,
    pub runtime: Option<u32>,
    pub air_date: Option<String>,
}

impl TmdbEpisode {
    #[must_use]
    pub fn to_episode(&self, image_base_url: &str) -> Episode {
        let id = self.id.map(|id| id.to_string()).unwrap_or_default();

        Episode {
            number: self.episode_number,
            title: non_empty(self.name.as_deref())
                .map_or_else(|| format!("Episode {}", self.episode_number), str::to_string),
            overview: self.overview.clone(),
            thumbnail_url: image_url(image_base_url, "w500", self.still_path.as_deref())
                .unwrap_or_else(|| format!("{POSTER_FALLBACK}/{id}/500/280")),
            runtime: self.runtime.map(|r| format!("{r}m")),
            release_date: self.air_date.clone(),
            id,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbSeason {
    pub episodes: Vec<TmdbEpisode>,
}

/// Applies a details/credits/videos triple to a listing record.
#[must_use]
pub fn apply_details(
    movie: &Movie,
    kind: MediaKind,
    details: &TmdbDetails,
    credits: &TmdbCredits,
    videos: &TmdbVideos,
    image_base_url: &str,
) -> Movie {
    let mut detailed = movie.clone();

    if let Some(genres) = &details.genres {
        detailed.genre = genres.iter().map(|g| g.name.clone()).collect();
    }

    detailed.duration = match kind {
        MediaKind::Movie => details
            .runtime
            .map_or_else(|| movie.duration.clone(), format_runtime),
        MediaKind::Tv => details
            .number_of_seasons
            .filter(|n| *n > 0)
            .map_or_else(|| "Saison 1".to_string(), |n| format!("Saisons: {n}")),
    };

    detailed.cast = credits
        .cast
        .iter()
        .take(crate::constants::limits::CAST_SIZE)
        .map(|c| c.name.clone())
        .collect();

    detailed.director = match kind {
        MediaKind::Movie => credits
            .crew
            .iter()
            .find(|c| c.job == "Director")
            .map_or_else(|| "Inconnu".to_string(), |c| c.name.clone()),
        MediaKind::Tv => details
            .created_by
            .as_ref()
            .and_then(|c| c.first())
            .map_or_else(|| "TMDB Production".to_string(), |c| c.name.clone()),
    };

    detailed.trailer_url = videos.trailer_embed_url();

    detailed.seasons = details
        .seasons
        .iter()
        .flatten()
        .map(|s| Season {
            id: s.id.map(|id| id.to_string()).unwrap_or_default(),
            number: s.season_number,
            title: non_empty(s.name.as_deref())
                .map_or_else(|| format!("Season {}", s.season_number), str::to_string),
            poster_url: Some(
                image_url(image_base_url, "w300", s.poster_path.as_deref())
                    .unwrap_or_else(|| movie.poster_url.clone()),
            ),
            ..Default::default()
        })
        .collect();

    detailed
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    language: String,
}

impl TmdbClient {
    #[must_use]
    pub fn new(client: Client, config: &TmdbConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        }
    }

    #[must_use]
    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, extra: &[(&str, String)]) -> Result<T> {
        let mut url = url::Url::parse(&format!("{}{}", self.base_url, path))?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("language", &self.language)
            .extend_pairs(extra.iter().map(|(k, v)| (*k, v.as_str())));

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TMDB API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }

    /// One page of a list endpoint such as `/trending/all/day`.
    pub async fn list(&self, endpoint: &str, page: u32) -> Result<Vec<TmdbItem>> {
        let paged: Paged<TmdbItem> = self.get(endpoint, &[("page", page.to_string())]).await?;
        Ok(paged.results)
    }

    pub async fn search_multi(&self, query: &str, page: u32) -> Result<Vec<TmdbItem>> {
        let paged: Paged<TmdbItem> = self
            .get(
                "/search/multi",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;
        Ok(paged.results)
    }

    pub async fn details(&self, kind: MediaKind, id: &str) -> Result<TmdbDetails> {
        self.get(&format!("/{}/{}", kind.as_path(), id), &[]).await
    }

    pub async fn credits(&self, kind: MediaKind, id: &str) -> Result<TmdbCredits> {
        self.get(&format!("/{}/{}/credits", kind.as_path(), id), &[])
            .await
    }

    pub async fn videos(&self, kind: MediaKind, id: &str) -> Result<TmdbVideos> {
        self.get(&format!("/{}/{}/videos", kind.as_path(), id), &[])
            .await
    }

    pub async fn season(&self, series_id: &str, season_number: u32) -> Result<TmdbSeason> {
        self.get(&format!("/tv/{series_id}/season/{season_number}"), &[])
            .await
    }

    pub async fn recommendations(&self, kind: MediaKind, id: &str) -> Result<Vec<TmdbItem>> {
        let paged: Paged<TmdbItem> = self
            .get(
                &format!("/{}/{}/recommendations", kind.as_path(), id),
                &[("page", "1".to_string())],
            )
            .await?;
        Ok(paged.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMG: &str = "https://image.tmdb.org/t/p";

    fn item(json: &str) -> TmdbItem {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_maps_trending_movie() {
        let movie = item(
            r#"{"id": 157336, "media_type": "movie", "title": "Interstellar",
                "release_date": "2014-11-05", "vote_average": 8.417, "genre_ids": [12, 18],
                "overview": "", "poster_path": "/p.jpg", "backdrop_path": null, "popularity": 140.6}"#,
        )
        .to_movie(IMG)
        .unwrap();

        assert_eq!(movie.id, "157336");
        assert_eq!(movie.tmdb_id.as_deref(), Some("157336"));
        assert_eq!(movie.year, 2014);
        assert_eq!(movie.rating, "8.4");
        assert_eq!(movie.duration, "2h 10m");
        assert_eq!(movie.genre, vec!["Action", "Drame"]);
        assert_eq!(movie.description, "Aucun synopsis disponible pour le moment.");
        assert_eq!(movie.poster_url, "https://image.tmdb.org/t/p/w500/p.jpg");
        assert_eq!(movie.backdrop_url, "https://picsum.photos/seed/157336/1200/600");
        assert!((movie.popularity - 141.0).abs() < f64::EPSILON);
        assert_eq!(movie.content_type, Some(ContentType::Movie));
        assert!(movie.episode.is_none());
    }

    #[test]
    fn test_maps_series_by_name() {
        let movie = item(r#"{"id": 1399, "name": "Game of Thrones", "first_air_date": ""}"#)
            .to_movie(IMG)
            .unwrap();

        assert_eq!(movie.content_type, Some(ContentType::Series));
        assert_eq!(movie.duration, "Saison 1");
        assert_eq!(movie.year, 2024);
        assert_eq!(movie.episode.as_deref(), Some("Épisode 1"));
        assert_eq!(movie.season, Some(1));
    }

    #[test]
    fn test_result_without_id_is_dropped() {
        assert!(item(r#"{"title": "Ghost"}"#).to_movie(IMG).is_none());
        assert_eq!(
            item(r#"{"id": 5}"#).to_movie(IMG).unwrap().title,
            "Sans titre"
        );
    }

    #[test]
    fn test_apply_details_for_movie() {
        let base = item(r#"{"id": 1, "title": "X"}"#).to_movie(IMG).unwrap();
        let details: TmdbDetails =
            serde_json::from_str(r#"{"genres": [{"name": "Drame"}], "runtime": 169}"#).unwrap();
        let credits: TmdbCredits = serde_json::from_str(
            r#"{"cast": [{"name":"a"},{"name":"b"},{"name":"c"},{"name":"d"},{"name":"e"},{"name":"f"}],
                "crew": [{"name": "Someone", "job": "Writer"}, {"name": "Nolan", "job": "Director"}]}"#,
        )
        .unwrap();
        let videos: TmdbVideos = serde_json::from_str(
            r#"{"results": [{"site": "Vimeo", "key": "v", "type": "Trailer"},
                            {"site": "YouTube", "key": "abc", "type": "Teaser"}]}"#,
        )
        .unwrap();

        let detailed = apply_details(&base, MediaKind::Movie, &details, &credits, &videos, IMG);
        assert_eq!(detailed.duration, "2h 49m");
        assert_eq!(detailed.cast.len(), 5);
        assert_eq!(detailed.director, "Nolan");
        assert_eq!(detailed.genre, vec!["Drame"]);
        assert_eq!(
            detailed.trailer_url.as_deref(),
            Some("https://www.youtube.com/embed/abc")
        );
    }

    #[test]
    fn test_apply_details_for_tv() {
        let base = item(r#"{"id": 2, "name": "Show", "poster_path": "/s.jpg"}"#)
            .to_movie(IMG)
            .unwrap();
        let details: TmdbDetails = serde_json::from_str(
            r#"{"number_of_seasons": 2, "created_by": [],
                "seasons": [{"id": 10, "season_number": 1, "name": "", "poster_path": null}]}"#,
        )
        .unwrap();

        let detailed = apply_details(
            &base,
            MediaKind::Tv,
            &details,
            &TmdbCredits::default(),
            &TmdbVideos::default(),
            IMG,
        );
        assert_eq!(detailed.duration, "Saisons: 2");
        assert_eq!(detailed.director, "TMDB Production");
        assert_eq!(detailed.seasons[0].title, "Season 1");
        assert_eq!(
            detailed.seasons[0].poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/s.jpg")
        );
        assert!(detailed.trailer_url.is_none());
    }

    #[test]
    fn test_import_draft_from_tv_details() {
        let details: TmdbDetails = serde_json::from_str(
            r#"{"id": 1399, "name": "Game of Thrones", "original_name": "Game of Thrones",
                "first_air_date": "2011-04-17", "vote_average": 8.456, "episode_run_time": [60],
                "genres": [{"name": "Drame"}],
                "seasons": [{"id": 3624, "season_number": 1, "name": "Saison 1"}]}"#,
        )
        .unwrap();

        let draft = details.to_draft(MediaKind::Tv, IMG).unwrap();
        assert_eq!(draft.id, "1399");
        assert_eq!(draft.year, 2011);
        assert_eq!(draft.release_date.as_deref(), Some("2011-04-17"));
        assert_eq!(draft.duration, "1h 0m");
        assert_eq!(draft.content_type, Some(ContentType::Series));
        assert_eq!(draft.slug.as_deref(), Some("game-of-thrones"));
        assert_eq!(draft.seasons[0].slug.as_deref(), Some("saison-1"));
        assert_eq!(draft.poster_url, "");
    }

    #[test]
    fn test_maps_season_episode() {
        let ep: TmdbEpisode = serde_json::from_str(
            r#"{"id": 63056, "episode_number": 3, "name": null, "runtime": 58, "air_date": "2011-05-01"}"#,
        )
        .unwrap();
        let episode = ep.to_episode(IMG);
        assert_eq!(episode.id, "63056");
        assert_eq!(episode.title, "Episode 3");
        assert_eq!(episode.runtime.as_deref(), Some("58m"));
        assert_eq!(episode.thumbnail_url, "https://picsum.photos/seed/63056/500/280");
    }
}
