//! Document-store implementation of the `ContentService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::clients::tmdb::MediaKind;
use crate::constants::{limits, storage_keys};
use crate::models::movie::{ContentType, Episode, Movie, Season};
use crate::services::content_service::{
    ContentError, ContentService, PublishOutcome, blank_episode, new_id, now_ms, validate_episode,
    validate_movie,
};
use crate::services::links::{DistributeReport, DistributeRequest, distribute};
use crate::services::metadata::MetadataSource;
use crate::services::slug::slugify;
use crate::store::DocumentStore;

pub struct DocumentContentService {
    store: DocumentStore,
    metadata: Arc<dyn MetadataSource>,
}

fn upsert_into(list: &mut Vec<Movie>, movie: Movie) {
    match list.iter().position(|m| m.same_title(&movie)) {
        Some(pos) => list[pos] = movie,
        None => list.insert(0, movie),
    }
}

fn find_mut<'a>(list: &'a mut [Movie], id: &str) -> Result<&'a mut Movie, ContentError> {
    list.iter_mut()
        .find(|m| m.has_id(id))
        .ok_or_else(|| ContentError::NotFound(id.to_string()))
}

impl DocumentContentService {
    #[must_use]
    pub fn new(store: DocumentStore, metadata: Arc<dyn MetadataSource>) -> Self {
        Self { store, metadata }
    }

    /// Runs `f` against one season of a managed title inside a single
    /// read-modify-write of the content document.
    async fn edit_season<R, F>(
        &self,
        series_id: &str,
        season_number: u32,
        f: F,
    ) -> Result<R, ContentError>
    where
        R: Send,
        F: FnOnce(Option<ContentType>, &mut Season) -> Result<R, ContentError> + Send,
    {
        self.store
            .update(storage_keys::CONTENT, |list: &mut Vec<Movie>| {
                let movie = find_mut(list, series_id)?;
                let content_type = movie.content_type;
                let season = movie.season_mut(season_number).ok_or_else(|| {
                    ContentError::SeasonNotFound {
                        series: series_id.to_string(),
                        season: season_number,
                    }
                })?;
                f(content_type, season)
            })
            .await
    }
}

#[async_trait]
impl ContentService for DocumentContentService {
    async fn list(&self) -> Result<Vec<Movie>, ContentError> {
        Ok(self.store.load_records(storage_keys::CONTENT).await?)
    }

    async fn get(&self, id: &str) -> Result<Movie, ContentError> {
        self.list()
            .await?
            .into_iter()
            .find(|m| m.has_id(id))
            .ok_or_else(|| ContentError::NotFound(id.to_string()))
    }

    async fn upsert(&self, movie: Movie) -> Result<Movie, ContentError> {
        let movie = validate_movie(movie)?;
        let stored = movie.clone();

        self.store
            .update(storage_keys::CONTENT, move |list: &mut Vec<Movie>| {
                upsert_into(list, stored);
                Ok::<_, ContentError>(())
            })
            .await?;

        info!("Saved title '{}' ({})", movie.title, movie.id);
        Ok(movie)
    }

    async fn remove(&self, id: &str) -> Result<usize, ContentError> {
        self.remove_many(&[id.to_string()]).await
    }

    async fn remove_many(&self, ids: &[String]) -> Result<usize, ContentError> {
        let removed = self
            .store
            .update(storage_keys::CONTENT, |list: &mut Vec<Movie>| {
                let before = list.len();
                list.retain(|m| !ids.iter().any(|id| m.has_id(id)));
                Ok::<_, ContentError>(before - list.len())
            })
            .await?;

        info!("Removed {} title(s)", removed);
        Ok(removed)
    }

    async fn toggle_pin(&self, id: &str) -> Result<Movie, ContentError> {
        self.store
            .update(storage_keys::CONTENT, |list: &mut Vec<Movie>| {
                let movie = find_mut(list, id)?;
                movie.is_pinned = !movie.is_pinned;
                Ok(movie.clone())
            })
            .await
    }

    async fn toggle_publish(&self, movie: Movie) -> Result<PublishOutcome, ContentError> {
        let list = self.list().await?;

        if list.iter().any(|m| m.same_title(&movie)) {
            let id = movie
                .identity()
                .map(str::to_string)
                .ok_or_else(|| ContentError::Validation("title has no identifier".to_string()))?;
            self.remove(&id).await?;
            return Ok(PublishOutcome::Removed { id });
        }

        let mut detailed = self.metadata.details(&movie).await;
        detailed.is_pinned = true;
        if detailed.id.is_empty() {
            detailed.id = movie.identity().map_or_else(new_id, str::to_string);
        }

        let stored = detailed.clone();
        self.store
            .update(storage_keys::CONTENT, move |list: &mut Vec<Movie>| {
                upsert_into(list, stored);
                Ok::<_, ContentError>(())
            })
            .await?;

        info!("Published '{}'", detailed.title);
        Ok(PublishOutcome::Added {
            movie: Box::new(detailed),
        })
    }

    async fn add_season(&self, series_id: &str) -> Result<Season, ContentError> {
        self.store
            .update(storage_keys::CONTENT, |list: &mut Vec<Movie>| {
                let movie = find_mut(list, series_id)?;
                let number = movie.seasons.iter().map(|s| s.number).max().unwrap_or(0) + 1;
                let title = if movie.is_type(ContentType::Manga) {
                    "Chapitres".to_string()
                } else {
                    format!("Season {number}")
                };

                let season = Season {
                    id: new_id(),
                    number,
                    slug: Some(slugify(&format!("season {number}"))),
                    title,
                    ..Default::default()
                };
                movie.seasons.push(season.clone());
                Ok(season)
            })
            .await
    }

    async fn save_episode(
        &self,
        series_id: &str,
        season_number: u32,
        mut episode: Episode,
    ) -> Result<Episode, ContentError> {
        self.edit_season(series_id, season_number, |content_type, season| {
            validate_episode(content_type, season, &episode)?;

            let existing = season.position_of(&episode.id, episode.number);
            if episode.id.is_empty() {
                episode.id = existing.map_or_else(new_id, |pos| season.episodes[pos].id.clone());
            }
            if episode.slug.as_deref().is_none_or(str::is_empty) {
                episode.slug = Some(slugify(&episode.title));
            }
            episode.last_updated = Some(now_ms());

            match existing {
                Some(pos) => season.episodes[pos] = episode.clone(),
                None => season.episodes.push(episode.clone()),
            }
            Ok(episode)
        })
        .await
    }

    async fn bulk_add_by_count(
        &self,
        series_id: &str,
        season_number: u32,
        count: u32,
    ) -> Result<Vec<Episode>, ContentError> {
        if count == 0 {
            return Err(ContentError::Validation("count must be at least 1".to_string()));
        }
        if count > limits::MAX_BULK_EPISODES {
            return Err(ContentError::Validation(format!(
                "count must be at most {}",
                limits::MAX_BULK_EPISODES
            )));
        }

        self.edit_season(series_id, season_number, |content_type, season| {
            let start = season
                .max_episode_number()
                .map_or(Some(1), |n| n.checked_add(1));
            let Some((start, last)) = start.and_then(|s| Some((s, s.checked_add(count - 1)?))) else {
                return Err(ContentError::Validation(
                    "episode numbers would exceed the maximum".to_string(),
                ));
            };
            let now = now_ms();

            let added: Vec<Episode> = (start..=last)
                .map(|n| blank_episode(content_type, n, now))
                .collect();
            season.episodes.extend(added.iter().cloned());
            Ok(added)
        })
        .await
    }

    async fn bulk_add_by_range(
        &self,
        series_id: &str,
        season_number: u32,
        from: u32,
        to: u32,
    ) -> Result<Vec<Episode>, ContentError> {
        if from < 1 || from > to {
            return Err(ContentError::Validation(format!("Invalid range {from}-{to}")));
        }
        if to - from >= limits::MAX_BULK_EPISODES {
            return Err(ContentError::Validation(format!(
                "Range {from}-{to} covers more than {} episodes",
                limits::MAX_BULK_EPISODES
            )));
        }

        self.edit_season(series_id, season_number, |content_type, season| {
            let now = now_ms();
            let added: Vec<Episode> = (from..=to)
                .filter(|n| !season.episodes.iter().any(|e| e.number == *n))
                .map(|n| blank_episode(content_type, n, now))
                .collect();

            season.episodes.extend(added.iter().cloned());
            season.episodes.sort_by_key(|e| e.number);
            Ok(added)
        })
        .await
    }

    async fn clear_season_players(
        &self,
        series_id: &str,
        season_number: u32,
    ) -> Result<(), ContentError> {
        self.edit_season(series_id, season_number, |_, season| {
            for episode in &mut season.episodes {
                episode.videos.clear();
                episode.images.clear();
            }
            Ok(())
        })
        .await
    }

    async fn delete_episodes(
        &self,
        series_id: &str,
        season_number: u32,
        episode_ids: &[String],
    ) -> Result<usize, ContentError> {
        self.edit_season(series_id, season_number, |_, season| {
            let before = season.episodes.len();
            season.episodes.retain(|e| !episode_ids.contains(&e.id));
            Ok(before - season.episodes.len())
        })
        .await
    }

    async fn distribute_links(
        &self,
        series_id: &str,
        request: DistributeRequest,
    ) -> Result<DistributeReport, ContentError> {
        let season_number = request.season;

        self.edit_season(series_id, season_number, |_, season| {
            if season.episodes.is_empty() {
                return Err(ContentError::Validation(format!(
                    "Season {season_number} has no episodes to fill"
                )));
            }
            Ok(distribute(season, &request, now_ms()))
        })
        .await
    }

    async fn sync_season(
        &self,
        series_id: &str,
        season_number: u32,
    ) -> Result<Vec<Episode>, ContentError> {
        let movie = self.get(series_id).await?;
        if movie.is_type(ContentType::Manga) {
            return Err(ContentError::Validation(
                "Manga chapters cannot be synced from a provider".to_string(),
            ));
        }

        let remote_id = movie.identity().unwrap_or(series_id).to_string();
        let fetched = self
            .metadata
            .season_episodes(&remote_id, season_number)
            .await;
        if fetched.is_empty() {
            return Err(ContentError::Import(format!(
                "No episodes found for season {season_number} of {remote_id}"
            )));
        }

        let episodes: Vec<Episode> = fetched
            .into_iter()
            .map(|mut ep| {
                let label = if ep.title.is_empty() {
                    format!("episode {}", ep.number)
                } else {
                    ep.title.clone()
                };
                ep.slug = Some(slugify(&label));
                ep.videos.clear();
                ep.images.clear();
                ep.langue = vec!["VF".to_string()];
                ep
            })
            .collect();

        let stored = episodes.clone();
        self.edit_season(series_id, season_number, move |_, season| {
            season.episodes = stored;
            Ok(())
        })
        .await?;

        info!(
            "Synced {} episode(s) into season {} of {}",
            episodes.len(),
            season_number,
            series_id
        );
        Ok(episodes)
    }

    async fn import_tmdb(&self, kind: MediaKind, id: &str) -> Result<Movie, ContentError> {
        self.metadata
            .import_tmdb(kind, id)
            .await?
            .ok_or_else(|| ContentError::NotFound(id.to_string()))
    }

    async fn import_mal(&self, mal_id: i64) -> Result<Movie, ContentError> {
        self.metadata
            .import_mal(mal_id)
            .await?
            .ok_or_else(|| ContentError::NotFound(format!("mal-{mal_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie::VideoSource;
    use crate::services::links::DistributionMode;
    use crate::services::metadata::tests_support::StubMetadata;

    fn service() -> DocumentContentService {
        DocumentContentService::new(DocumentStore::in_memory(), Arc::new(StubMetadata::default()))
    }

    fn series(id: &str) -> Movie {
        Movie {
            id: id.to_string(),
            tmdb_id: Some(id.to_string()),
            title: format!("Series {id}"),
            content_type: Some(ContentType::Series),
            seasons: vec![Season {
                id: "s1".to_string(),
                number: 1,
                title: "Season 1".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_or_prepends() {
        let svc = service();
        svc.upsert(series("1")).await.unwrap();
        svc.upsert(series("2")).await.unwrap();

        let mut renamed = series("1");
        renamed.title = "Renamed".to_string();
        svc.upsert(renamed).await.unwrap();

        let list = svc.list().await.unwrap();
        let titles: Vec<_> = list.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Series 2", "Renamed"]);
    }

    #[tokio::test]
    async fn test_remove_and_pin() {
        let svc = service();
        svc.upsert(series("1")).await.unwrap();
        svc.upsert(series("2")).await.unwrap();
        svc.upsert(series("3")).await.unwrap();

        assert!(svc.toggle_pin("2").await.unwrap().is_pinned);
        assert!(!svc.toggle_pin("2").await.unwrap().is_pinned);
        assert!(matches!(
            svc.toggle_pin("missing").await,
            Err(ContentError::NotFound(_))
        ));

        assert_eq!(svc.remove("1").await.unwrap(), 1);
        assert_eq!(
            svc.remove_many(&["2".to_string(), "3".to_string()]).await.unwrap(),
            2
        );
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_publish_adds_pinned_then_removes() {
        let svc = service();
        let item = series("9");

        match svc.toggle_publish(item.clone()).await.unwrap() {
            PublishOutcome::Added { movie } => assert!(movie.is_pinned),
            other @ PublishOutcome::Removed { .. } => panic!("unexpected {other:?}"),
        }
        assert_eq!(svc.list().await.unwrap().len(), 1);

        assert!(matches!(
            svc.toggle_publish(item).await.unwrap(),
            PublishOutcome::Removed { .. }
        ));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_add_by_count_and_range() {
        let svc = service();
        svc.upsert(series("1")).await.unwrap();

        let added = svc.bulk_add_by_count("1", 1, 3).await.unwrap();
        let numbers: Vec<_> = added.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(added[0].title, "Episode 1");

        let added = svc.bulk_add_by_count("1", 1, 2).await.unwrap();
        assert_eq!(added[0].number, 4);

        let added = svc.bulk_add_by_range("1", 1, 2, 8).await.unwrap();
        let numbers: Vec<_> = added.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![6, 7, 8]);

        let movie = svc.get("1").await.unwrap();
        let all: Vec<_> = movie.seasons[0].episodes.iter().map(|e| e.number).collect();
        assert_eq!(all, (1..=8).collect::<Vec<_>>());

        assert!(matches!(
            svc.bulk_add_by_range("1", 1, 5, 2).await,
            Err(ContentError::Validation(_))
        ));
        assert!(svc.bulk_add_by_range("1", 1, 0, 2).await.is_err());
        assert!(matches!(
            svc.bulk_add_by_count("1", 9, 1).await,
            Err(ContentError::SeasonNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_bad_record_is_skipped_on_read_and_blocks_writes() {
        let store = DocumentStore::in_memory();
        let raw = r#"[
            {"id": "a", "title": "Broken", "seasons": "x"},
            {"id": "b", "title": "Keep B", "type": "movie", "year": null}
        ]"#;
        store
            .put_raw(storage_keys::CONTENT, raw.to_string())
            .await
            .unwrap();
        let svc = DocumentContentService::new(store.clone(), Arc::new(StubMetadata::default()));

        let list = svc.list().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "Keep B");
        assert_eq!(list[0].year, 0);

        assert!(matches!(
            svc.upsert(series("1")).await,
            Err(ContentError::Store(crate::store::StoreError::Corrupt { .. }))
        ));
        assert_eq!(
            store.raw(storage_keys::CONTENT).await.unwrap().as_deref(),
            Some(raw)
        );
    }

    #[tokio::test]
    async fn test_legacy_film_planning_entry_is_accepted() {
        let svc = service();
        let film: Movie = serde_json::from_str(
            r#"{
                "id": "f1",
                "title": "Old Film",
                "type": "movie",
                "planningEntries": [{"day": 3, "month": 8, "time": "21h00", "language": "VF"}]
            }"#,
        )
        .unwrap();

        let saved = svc.upsert(film).await.unwrap();
        assert_eq!(saved.planning_entries[0].month(), Some(8));
        assert_eq!(svc.get("f1").await.unwrap().planning_entries, saved.planning_entries);
    }

    #[tokio::test]
    async fn test_bulk_add_rejects_oversized_requests() {
        let svc = service();
        svc.upsert(series("1")).await.unwrap();

        assert!(matches!(
            svc.bulk_add_by_count("1", 1, u32::MAX).await,
            Err(ContentError::Validation(_))
        ));
        assert!(matches!(
            svc.bulk_add_by_range("1", 1, 1, u32::MAX).await,
            Err(ContentError::Validation(_))
        ));

        svc.save_episode(
            "1",
            1,
            Episode {
                number: u32::MAX - 1,
                title: "Last".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(matches!(
            svc.bulk_add_by_count("1", 1, 5).await,
            Err(ContentError::Validation(_))
        ));

        let added = svc.bulk_add_by_count("1", 1, 1).await.unwrap();
        assert_eq!(added[0].number, u32::MAX);
        assert!(svc.bulk_add_by_count("1", 1, 1).await.is_err());

        let added = svc
            .bulk_add_by_range("1", 1, 1, limits::MAX_BULK_EPISODES)
            .await
            .unwrap();
        assert_eq!(added.len(), limits::MAX_BULK_EPISODES as usize);
    }

    #[tokio::test]
    async fn test_save_episode_merges_by_number() {
        let svc = service();
        svc.upsert(series("1")).await.unwrap();
        svc.bulk_add_by_count("1", 1, 1).await.unwrap();

        let saved = svc
            .save_episode(
                "1",
                1,
                Episode {
                    number: 1,
                    title: "Le Départ".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(saved.slug.as_deref(), Some("le-dpart"));
        assert!(saved.last_updated.is_some());

        let movie = svc.get("1").await.unwrap();
        assert_eq!(movie.seasons[0].episodes.len(), 1);
        assert_eq!(movie.seasons[0].episodes[0].title, "Le Départ");
        assert_eq!(movie.seasons[0].episodes[0].id, saved.id);

        let rejected = svc
            .save_episode(
                "1",
                1,
                Episode {
                    number: 2,
                    images: vec!["page.jpg".to_string()],
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(rejected, Err(ContentError::Validation(_))));
    }

    #[tokio::test]
    async fn test_clear_delete_and_distribute() {
        let svc = service();
        svc.upsert(series("1")).await.unwrap();
        let added = svc.bulk_add_by_count("1", 1, 3).await.unwrap();

        let report = svc
            .distribute_links(
                "1",
                DistributeRequest {
                    season: 1,
                    initial_episode: 2,
                    text: "a\n\nb\n\nc".to_string(),
                    mode: DistributionMode::Video,
                    link_type: crate::services::links::LinkType::Download,
                    language: "VOSTFR".to_string(),
                    quality: "HD".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(report.updated, vec![2, 3]);
        assert_eq!(report.skipped, vec![4]);

        let movie = svc.get("1").await.unwrap();
        let ep2 = &movie.seasons[0].episodes[1];
        assert_eq!(
            ep2.videos,
            vec![VideoSource {
                kind: "Download".to_string(),
                label: "LECTEUR 1".to_string(),
                url: "a".to_string(),
                langue: "VOSTFR".to_string(),
                quality: "HD".to_string(),
            }]
        );

        svc.clear_season_players("1", 1).await.unwrap();
        let movie = svc.get("1").await.unwrap();
        assert!(movie.seasons[0].episodes.iter().all(|e| e.videos.is_empty()));

        let removed = svc
            .delete_episodes("1", 1, &[added[0].id.clone(), "nope".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn test_distribute_needs_episodes() {
        let svc = service();
        svc.upsert(series("1")).await.unwrap();

        let result = svc
            .distribute_links(
                "1",
                DistributeRequest {
                    season: 1,
                    initial_episode: 1,
                    text: "a".to_string(),
                    mode: DistributionMode::Video,
                    link_type: crate::services::links::LinkType::Online,
                    language: "VF".to_string(),
                    quality: "HD".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(ContentError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sync_season_resets_media() {
        let svc = service();
        svc.upsert(series("1")).await.unwrap();

        let episodes = svc.sync_season("1", 1).await.unwrap();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].slug.as_deref(), Some("pilot"));
        assert_eq!(episodes[0].langue, vec!["VF"]);

        let stored = svc.get("1").await.unwrap();
        assert_eq!(stored.seasons[0].episodes, episodes);
    }

    #[tokio::test]
    async fn test_add_season() {
        let svc = service();
        svc.upsert(series("1")).await.unwrap();
        let season = svc.add_season("1").await.unwrap();
        assert_eq!(season.number, 2);
        assert_eq!(season.title, "Season 2");
    }
}
