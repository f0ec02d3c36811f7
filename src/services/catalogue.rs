//! Catalogue listings: managed records merged with a remote page.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clients::tmdb::MediaKind;
use crate::config::CatalogueConfig;
use crate::constants::storage_keys;
use crate::models::movie::{ContentType, Episode, Movie};
use crate::services::metadata::MetadataSource;
use crate::services::sequencer::RequestSequencer;
use crate::store::{DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("Title not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Storefront type tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    /// Series and anime.
    Anime,
    /// Manga.
    Scans,
    Film,
    All,
}

impl TypeFilter {
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label {
            "Anime" => Self::Anime,
            "Scans" => Self::Scans,
            "Film" => Self::Film,
            _ => Self::All,
        }
    }

    #[must_use]
    pub fn matches(self, movie: &Movie) -> bool {
        match self {
            Self::Anime => movie.content_type.is_some_and(ContentType::is_episodic_video),
            Self::Scans => movie.is_type(ContentType::Manga),
            Self::Film => movie.is_type(ContentType::Movie),
            Self::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Home,
    HomeMovies,
    HomeSeries,
    HomeManga,
    Catalogue,
    Search,
    Genre,
}

impl View {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::HomeMovies => "home-movies",
            Self::HomeSeries => "home-series",
            Self::HomeManga => "home-manga",
            Self::Catalogue => "catalogue",
            Self::Search => "search",
            Self::Genre => "genre",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "home" => Some(Self::Home),
            "home-movies" => Some(Self::HomeMovies),
            "home-series" => Some(Self::HomeSeries),
            "home-manga" => Some(Self::HomeManga),
            "catalogue" => Some(Self::Catalogue),
            "search" => Some(Self::Search),
            "genre" => Some(Self::Genre),
            _ => None,
        }
    }

    /// Type tab a view opens with.
    #[must_use]
    pub const fn default_type(self) -> Option<&'static str> {
        match self {
            Self::HomeMovies => Some("Film"),
            Self::HomeManga => Some("Scans"),
            Self::HomeSeries => Some("Anime"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogueFilters {
    /// Type tab label ("Anime", "Scans", "Film").
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub search: Option<String>,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl CatalogueFilters {
    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        present(self.search.as_ref())
    }

    #[must_use]
    pub fn genre_text(&self) -> Option<&str> {
        present(self.genre.as_ref())
    }

    #[must_use]
    pub fn type_label(&self) -> Option<&str> {
        present(self.content_type.as_ref())
    }

    #[must_use]
    pub fn language_code(&self) -> Option<&str> {
        present(self.language.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteQuery {
    pub main: String,
    pub trending: String,
    /// Search endpoint rather than a listing.
    pub use_search: bool,
    pub page_size: usize,
}

#[must_use]
pub fn build_remote_query(
    view: View,
    filters: &CatalogueFilters,
    config: &CatalogueConfig,
) -> RemoteQuery {
    let search = filters.search_text();
    let genre = filters.genre_text();

    let (main, trending) = match view {
        View::HomeSeries => (
            "séries tv populaires 2024 streaming".to_string(),
            "top rated tv series tmdb",
        ),
        View::HomeMovies => (
            "films populaires cinema 2024".to_string(),
            "trending movie box office",
        ),
        View::HomeManga => ("manga popular scans 2024".to_string(), "top manga mal"),
        View::Catalogue => {
            let combined = [filters.type_label(), genre, filters.language_code()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            let main = if combined.trim().is_empty() {
                "trending content catalog".to_string()
            } else {
                combined.trim().to_string()
            };
            (main, "box office hits all time")
        }
        View::Home | View::Search | View::Genre => (
            search
                .or(genre)
                .unwrap_or("trending movies 2024")
                .to_string(),
            "box office hits all time",
        ),
    };

    RemoteQuery {
        main,
        trending: trending.to_string(),
        use_search: search.is_some() || genre.is_some(),
        page_size: if view == View::Catalogue {
            config.catalogue_page_size
        } else {
            config.page_size
        },
    }
}

fn matches_managed(managed: &[Movie], movie: &Movie) -> Option<usize> {
    managed.iter().position(|m| m.same_title(movie))
}

/// Managed records first (pinned ones leading), then remote results not
/// already present. Duplicates and identifier-less records are dropped, as
/// are planning-only titles. The type and language filters apply last.
#[must_use]
pub fn merge_catalogue(
    managed: &[Movie],
    remote: Vec<Movie>,
    filters: &CatalogueFilters,
    default_language: &str,
) -> Vec<Movie> {
    let pinned = managed.iter().filter(|m| m.is_pinned);
    let others = managed.iter().filter(|m| !m.is_pinned);

    let remote_only = remote
        .into_iter()
        .filter(|item| matches_managed(managed, item).is_none());

    let mut seen = HashSet::new();
    let unique = pinned
        .chain(others)
        .cloned()
        .chain(remote_only)
        .filter(|m| m.identity().is_some_and(|id| seen.insert(id.to_string())));

    let type_filter = filters.type_label().map(TypeFilter::parse);
    let language = filters.language_code();

    unique
        .filter(|m| {
            matches_managed(managed, m).is_none_or(|idx| !managed[idx].is_planning_only())
        })
        .filter(|m| type_filter.is_none_or(|t| t.matches(m)))
        .filter(|m| {
            language.is_none_or(|code| match &m.langue {
                Some(langs) => langs.iter().any(|l| l == code),
                None => code == default_language,
            })
        })
        .collect()
}

/// Whether the trending fetch is needed to fill the top rail.
#[must_use]
pub fn needs_trending(managed: &[Movie], size: usize) -> bool {
    managed.iter().filter(|m| m.is_pinned).count() < size
}

#[must_use]
pub fn top_rail(managed: &[Movie], trending: Vec<Movie>, size: usize) -> Vec<Movie> {
    managed
        .iter()
        .filter(|m| m.is_pinned)
        .cloned()
        .chain(trending)
        .take(size)
        .collect()
}

/// Remote detail overlaid with the local record. Local seasons win when the
/// local record has any.
#[must_use]
pub fn merge_detail(local: Option<&Movie>, detailed: Movie) -> Movie {
    match local {
        None => detailed,
        Some(local) => {
            let mut merged = local.clone();
            if merged.seasons.is_empty() {
                merged.seasons = detailed.seasons;
            }
            merged
        }
    }
}

#[must_use]
pub fn random_pick(items: &[Movie]) -> Option<&Movie> {
    items.choose(&mut rand::rng())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPage {
    pub view: View,
    pub page: u32,
    pub movies: Vec<Movie>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Vec<Movie>>,
    /// A newer load of the same view started while this one was in flight.
    pub superseded: bool,
}

pub struct CatalogueService {
    store: DocumentStore,
    metadata: Arc<dyn MetadataSource>,
    sequencer: RequestSequencer<Vec<Movie>>,
    config: CatalogueConfig,
}

impl CatalogueService {
    #[must_use]
    pub fn new(
        store: DocumentStore,
        metadata: Arc<dyn MetadataSource>,
        config: CatalogueConfig,
    ) -> Self {
        Self {
            store,
            metadata,
            sequencer: RequestSequencer::new(),
            config,
        }
    }

    async fn managed(&self) -> Result<Vec<Movie>, StoreError> {
        self.store.load_records(storage_keys::CONTENT).await
    }

    /// Loads one page of a view. With a `scope` (one client or tab) the
    /// result is guarded against newer loads of the same view in that scope
    /// and becomes its snapshot; without one the result is returned as is.
    pub async fn load_view(
        &self,
        view: View,
        filters: &CatalogueFilters,
        page: u32,
        scope: Option<&str>,
    ) -> Result<ViewPage, CatalogueError> {
        let ticket = match scope {
            Some(scope) => Some(self.sequencer.begin(scope, view.key()).await),
            None => None,
        };
        let page = page.max(1);

        let mut filters = filters.clone();
        if filters.type_label().is_none() {
            filters.content_type = view.default_type().map(str::to_string);
        }

        let query = build_remote_query(view, &filters, &self.config);
        debug!(view = view.key(), query = %query.main, page, "Loading view");

        let remote = if query.use_search {
            self.metadata.search(&query.main, page).await
        } else {
            self.metadata
                .fetch(&query.main, query.page_size, page)
                .await
        };

        let managed = self.managed().await?;
        let movies = merge_catalogue(
            &managed,
            remote,
            &filters,
            &self.config.default_language,
        );

        let top = if view == View::Home && page == 1 {
            let size = self.config.top_rail_size;
            let trending = if needs_trending(&managed, size) {
                self.metadata.fetch(&query.trending, size, 1).await
            } else {
                Vec::new()
            };
            Some(top_rail(&managed, trending, size))
        } else {
            None
        };

        let superseded = match &ticket {
            Some(ticket) => !self.sequencer.commit(ticket, movies.clone()).await,
            None => false,
        };

        Ok(ViewPage {
            view,
            page,
            movies,
            top,
            superseded,
        })
    }

    /// Most recent committed listing of a view in a scope.
    pub async fn snapshot(&self, scope: &str, view: View) -> Option<Vec<Movie>> {
        self.sequencer.snapshot(scope, view.key()).await
    }

    pub async fn random(&self, filters: &CatalogueFilters) -> Result<Option<Movie>, CatalogueError> {
        let page = self.load_view(View::Catalogue, filters, 1, None).await?;
        Ok(random_pick(&page.movies).cloned())
    }

    /// Full record for a title. Managed titles that already carry episodes
    /// are returned as stored; everything else goes through the remote detail
    /// lookup.
    pub async fn detail(
        &self,
        id: &str,
        content_type: Option<ContentType>,
    ) -> Result<Movie, CatalogueError> {
        let managed = self.managed().await?;
        let local = managed.iter().find(|m| m.has_id(id));

        if let Some(local) = local
            && local.has_episodes()
        {
            return Ok(local.clone());
        }

        let base = match local {
            Some(local) => local.clone(),
            None => self
                .remote_base(id, content_type)
                .await
                .ok_or_else(|| CatalogueError::NotFound(id.to_string()))?,
        };

        let detailed = self.metadata.details(&base).await;
        info!("Loaded detail for {}", id);

        Ok(merge_detail(local, detailed))
    }

    async fn remote_base(&self, id: &str, content_type: Option<ContentType>) -> Option<Movie> {
        let result = match id
            .strip_prefix("manga-")
            .or_else(|| id.strip_prefix("mal-"))
            .and_then(|mal| mal.parse::<i64>().ok())
        {
            Some(mal_id) => self.metadata.import_mal(mal_id).await,
            None => {
                let kind = match content_type {
                    Some(ct) if ct.is_episodic_video() => MediaKind::Tv,
                    _ => MediaKind::Movie,
                };
                self.metadata.import_tmdb(kind, id).await
            }
        };

        match result {
            Ok(Some(mut movie)) => {
                if content_type.is_some() {
                    movie.content_type = content_type;
                }
                Some(movie)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Remote lookup for {} failed: {}", id, e);
                None
            }
        }
    }

    pub async fn recommendations(&self, id: &str, is_series: bool) -> Vec<Movie> {
        self.metadata.recommendations(id, is_series).await
    }

    /// Episodes of one season: the managed ones when present, otherwise the
    /// remote listing.
    pub async fn season_episodes(
        &self,
        id: &str,
        season_number: u32,
    ) -> Result<Vec<Episode>, CatalogueError> {
        let managed = self.managed().await?;

        if let Some(season) = managed
            .iter()
            .find(|m| m.has_id(id))
            .and_then(|m| m.season(season_number))
            .filter(|s| !s.episodes.is_empty())
        {
            return Ok(season.episodes.clone());
        }

        Ok(self.metadata.season_episodes(id, season_number).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, ct: ContentType) -> Movie {
        Movie {
            id: id.to_string(),
            tmdb_id: Some(id.to_string()),
            title: id.to_uppercase(),
            content_type: Some(ct),
            ..Default::default()
        }
    }

    fn filters(content_type: Option<&str>, language: Option<&str>) -> CatalogueFilters {
        CatalogueFilters {
            content_type: content_type.map(str::to_string),
            language: language.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_pinned_first_then_managed_then_remote() {
        let mut a = movie("a", ContentType::Series);
        a.is_pinned = true;
        let b = movie("b", ContentType::Series);

        let mut remote_b = movie("b", ContentType::Series);
        remote_b.title = "remote copy".to_string();
        let remote = vec![remote_b, movie("c", ContentType::Anime)];

        let merged = merge_catalogue(&[b, a], remote, &filters(Some("Anime"), None), "VOSTFR");
        let ids: Vec<_> = merged.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(merged[1].title, "B");
    }

    #[test]
    fn test_dedup_and_identifier_less_records() {
        let remote = vec![
            movie("x", ContentType::Movie),
            Movie {
                id: "y".to_string(),
                tmdb_id: Some("x".to_string()),
                ..Default::default()
            },
            Movie::default(),
            movie("z", ContentType::Movie),
        ];

        let merged = merge_catalogue(&[], remote, &CatalogueFilters::default(), "VOSTFR");
        let ids: Vec<_> = merged.iter().filter_map(Movie::identity).collect();
        assert_eq!(ids, vec!["x", "z"]);

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_planning_only_titles_hidden_from_remote_copy_too() {
        let mut planned = movie("p", ContentType::Anime);
        planned.in_planning_page = true;

        let merged = merge_catalogue(
            &[planned.clone()],
            vec![movie("p", ContentType::Anime)],
            &CatalogueFilters::default(),
            "VOSTFR",
        );
        assert!(merged.is_empty());

        planned.is_recent_addition = true;
        let merged = merge_catalogue(&[planned], vec![], &CatalogueFilters::default(), "VOSTFR");
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_type_filters() {
        let items = vec![
            movie("1", ContentType::Movie),
            movie("2", ContentType::Series),
            movie("3", ContentType::Anime),
            movie("4", ContentType::Manga),
        ];

        let ids = |label: Option<&str>| -> Vec<String> {
            merge_catalogue(&[], items.clone(), &filters(label, None), "VOSTFR")
                .into_iter()
                .map(|m| m.id)
                .collect()
        };

        assert_eq!(ids(Some("Anime")), vec!["2", "3"]);
        assert_eq!(ids(Some("Scans")), vec!["4"]);
        assert_eq!(ids(Some("Film")), vec!["1"]);
        assert_eq!(ids(Some("Other")).len(), 4);
        assert_eq!(ids(None).len(), 4);
    }

    #[test]
    fn test_language_filter_uses_default_for_untagged() {
        let mut vf = movie("vf", ContentType::Movie);
        vf.langue = Some(vec!["VF".to_string()]);
        let mut empty = movie("empty", ContentType::Movie);
        empty.langue = Some(vec![]);
        let untagged = movie("untagged", ContentType::Movie);
        let items = vec![vf, empty, untagged];

        let vostfr = merge_catalogue(&[], items.clone(), &filters(None, Some("VOSTFR")), "VOSTFR");
        assert_eq!(vostfr.len(), 1);
        assert_eq!(vostfr[0].id, "untagged");

        let vf_only = merge_catalogue(&[], items, &filters(None, Some("VF")), "VOSTFR");
        assert_eq!(vf_only.len(), 1);
        assert_eq!(vf_only[0].id, "vf");
    }

    #[test]
    fn test_build_remote_query() {
        let config = CatalogueConfig::default();

        let home = build_remote_query(View::Home, &CatalogueFilters::default(), &config);
        assert_eq!(home.main, "trending movies 2024");
        assert_eq!(home.trending, "box office hits all time");
        assert!(!home.use_search);
        assert_eq!(home.page_size, 16);

        let catalogue = build_remote_query(
            View::Catalogue,
            &CatalogueFilters {
                content_type: Some("Anime".to_string()),
                genre: Some("Action".to_string()),
                ..Default::default()
            },
            &config,
        );
        assert_eq!(catalogue.main, "Anime Action");
        assert!(catalogue.use_search);
        assert_eq!(catalogue.page_size, 24);

        let empty = build_remote_query(View::Catalogue, &CatalogueFilters::default(), &config);
        assert_eq!(empty.main, "trending content catalog");

        let search = build_remote_query(
            View::Search,
            &CatalogueFilters {
                search: Some("naruto".to_string()),
                ..Default::default()
            },
            &config,
        );
        assert_eq!(search.main, "naruto");
        assert!(search.use_search);

        let manga = build_remote_query(View::HomeManga, &CatalogueFilters::default(), &config);
        assert_eq!(manga.main, "manga popular scans 2024");
        assert_eq!(manga.trending, "top manga mal");
    }

    #[test]
    fn test_top_rail() {
        let mut pinned: Vec<Movie> = (0..3)
            .map(|i| movie(&format!("p{i}"), ContentType::Movie))
            .collect();
        for p in &mut pinned {
            p.is_pinned = true;
        }
        let trending: Vec<Movie> = (0..5)
            .map(|i| movie(&format!("t{i}"), ContentType::Movie))
            .collect();

        assert!(needs_trending(&pinned, 5));
        let rail = top_rail(&pinned, trending, 5);
        let ids: Vec<_> = rail.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["p0", "p1", "p2", "t0", "t1"]);

        let many: Vec<Movie> = (0..6)
            .map(|i| Movie {
                is_pinned: true,
                ..movie(&format!("m{i}"), ContentType::Movie)
            })
            .collect();
        assert!(!needs_trending(&many, 5));
        assert_eq!(top_rail(&many, vec![], 5).len(), 5);
    }

    #[test]
    fn test_merge_detail_keeps_local_fields() {
        let mut local = movie("1", ContentType::Series);
        local.title = "Mon titre".to_string();

        let mut detailed = movie("1", ContentType::Series);
        detailed.title = "Remote".to_string();
        detailed.cast = vec!["Someone".to_string()];
        detailed.seasons = vec![crate::models::movie::Season {
            number: 1,
            ..Default::default()
        }];

        let merged = merge_detail(Some(&local), detailed.clone());
        assert_eq!(merged.title, "Mon titre");
        assert_eq!(merged.seasons.len(), 1);

        assert_eq!(merge_detail(None, detailed.clone()), detailed);
    }

    #[test]
    fn test_random_pick() {
        assert!(random_pick(&[]).is_none());
        let items = vec![movie("1", ContentType::Movie), movie("2", ContentType::Movie)];
        let picked = random_pick(&items).unwrap();
        assert!(items.contains(picked));
    }

    fn service(listing: Vec<Movie>) -> CatalogueService {
        CatalogueService::new(
            DocumentStore::in_memory(),
            Arc::new(crate::services::metadata::tests_support::StubMetadata { listing }),
            CatalogueConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_concurrent_scopes_are_not_superseded() {
        let svc = service(vec![movie("r1", ContentType::Movie)]);
        let none = CatalogueFilters::default();

        let (alice, bob) = tokio::join!(
            svc.load_view(View::Catalogue, &none, 1, Some("alice")),
            svc.load_view(View::Catalogue, &none, 1, Some("bob")),
        );
        assert!(!alice.unwrap().superseded);
        assert!(!bob.unwrap().superseded);

        assert!(svc.snapshot("alice", View::Catalogue).await.is_some());
        assert!(svc.snapshot("bob", View::Catalogue).await.is_some());
        assert!(svc.snapshot("carol", View::Catalogue).await.is_none());
    }

    #[tokio::test]
    async fn test_unscoped_load_keeps_no_snapshot() {
        let svc = service(vec![movie("r1", ContentType::Movie)]);

        let page = svc
            .load_view(View::Catalogue, &CatalogueFilters::default(), 1, None)
            .await
            .unwrap();
        assert!(!page.superseded);
        assert_eq!(page.movies.len(), 1);
        assert!(svc.snapshot("", View::Catalogue).await.is_none());
    }
}
