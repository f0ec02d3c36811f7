use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use crate::config::JikanConfig;
use crate::models::movie::{ContentType, Movie, Season};
use crate::services::slug::slugify;

#[derive(Debug, Deserialize)]
struct JikanResponse<T> {
    data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MalManga {
    pub mal_id: i64,
    pub title: String,
    pub score: Option<f64>,
    pub chapters: Option<u32>,
    pub status: Option<String>,
    pub synopsis: Option<String>,
    pub popularity: Option<f64>,
    pub genres: Option<Vec<MalGenericInfo>>,
    pub authors: Option<Vec<MalGenericInfo>>,
    pub images: Option<MalImages>,
    pub published: Option<Published>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MalGenericInfo {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MalImages {
    pub jpg: Option<MalImageSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MalImageSet {
    pub image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Published {
    pub from: Option<String>,
    pub prop: Option<PublishedProp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishedProp {
    pub from: Option<PublishedDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishedDate {
    pub year: Option<i32>,
}

impl MalManga {
    pub fn get_start_year(&self) -> Option<i32> {
        self.published
            .as_ref()
            .and_then(|p| p.prop.as_ref())
            .and_then(|p| p.from.as_ref())
            .and_then(|f| f.year)
    }

    fn jpg(&self) -> Option<&MalImageSet> {
        self.images.as_ref().and_then(|i| i.jpg.as_ref())
    }

    #[must_use]
    pub fn to_movie(&self) -> Movie {
        let large = self.jpg().and_then(|j| j.large_image_url.clone());
        let poster = large
            .clone()
            .or_else(|| self.jpg().and_then(|j| j.image_url.clone()))
            .unwrap_or_default();

        let chapters = self
            .chapters
            .map_or_else(|| "?".to_string(), |c| c.to_string());

        Movie {
            id: format!("manga-{}", self.mal_id),
            tmdb_id: Some(format!("mal-{}", self.mal_id)),
            title: self.title.clone(),
            year: self.get_start_year().filter(|y| *y != 0).unwrap_or(2024),
            rating: format!("{:.1}", self.score.unwrap_or(0.0)),
            duration: format!("{chapters} Chapitres"),
            genre: self.genres.as_ref().map_or_else(
                || vec!["Manga".to_string()],
                |g| g.iter().map(|g| g.name.clone()).collect(),
            ),
            description: self
                .synopsis
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Aucun synopsis disponible.".to_string()),
            poster_url: poster,
            backdrop_url: large.unwrap_or_default(),
            director: self
                .authors
                .as_ref()
                .and_then(|a| a.first())
                .map_or_else(|| "Auteur Inconnu".to_string(), |a| a.name.clone()),
            popularity: self.popularity.unwrap_or(0.0),
            content_type: Some(ContentType::Manga),
            episode: Some(format!(
                "Chap. {}",
                self.chapters.map_or_else(|| "1".to_string(), |c| c.to_string())
            )),
            season: Some(1),
            status: self.status.clone(),
            ..Default::default()
        }
    }

    /// Unsaved admin draft with a single "Chapitres" season to fill in.
    #[must_use]
    pub fn to_draft(&self) -> Movie {
        let large = self.jpg().and_then(|j| j.large_image_url.clone()).unwrap_or_default();
        let chapters = self
            .chapters
            .map_or_else(|| "?".to_string(), |c| c.to_string());

        Movie {
            id: format!("manga-{}", self.mal_id),
            tmdb_id: Some(format!("mal-{}", self.mal_id)),
            title: self.title.clone(),
            year: self.get_start_year().filter(|y| *y != 0).unwrap_or(2024),
            description: self.synopsis.clone().unwrap_or_default(),
            release_date: self.published.as_ref().and_then(|p| p.from.clone()),
            rating: format!("{:.1}", self.score.unwrap_or(0.0)),
            duration: format!("{chapters} chapters"),
            poster_url: large.clone(),
            backdrop_url: large,
            genre: self
                .genres
                .iter()
                .flatten()
                .map(|g| g.name.clone())
                .collect(),
            langue: Some(vec!["VF".to_string()]),
            content_type: Some(ContentType::Manga),
            status: Some("Publish".to_string()),
            seasons: vec![Season {
                id: "1".to_string(),
                number: 1,
                title: "Chapitres".to_string(),
                slug: Some("chapters".to_string()),
                ..Default::default()
            }],
            slug: Some(slugify(&self.title)),
            ..Default::default()
        }
    }
}

#[derive(Clone)]
pub struct JikanClient {
    client: Client,
    base_url: String,
}

impl JikanClient {
    #[must_use]
    pub fn new(client: Client, config: &JikanConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_page(&self, url: &str) -> Result<Vec<MalManga>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Jikan API error: {} - {}", status, body));
        }

        let response: JikanResponse<Vec<MalManga>> = response.json().await?;

        Ok(response.data)
    }

    pub async fn search_manga(&self, query: &str, page: u32) -> Result<Vec<MalManga>> {
        let url = format!(
            "{}/manga?q={}&page={}",
            self.base_url,
            urlencoding::encode(query),
            page
        );
        self.get_page(&url).await
    }

    pub async fn top_manga(&self, page: u32) -> Result<Vec<MalManga>> {
        let url = format!("{}/top/manga?page={}", self.base_url, page);
        self.get_page(&url).await
    }

    pub async fn get_manga(&self, mal_id: i64) -> Result<Option<MalManga>> {
        let url = format!("{}/manga/{}", self.base_url, mal_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Jikan API error: {} - {}", status, body));
        }

        let response: JikanResponse<MalManga> = response.json().await?;

        Ok(Some(response.data))
    }
}
