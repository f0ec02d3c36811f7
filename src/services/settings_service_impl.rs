//! Document-store implementation of the `SettingsService` trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::constants::storage_keys;
use crate::models::settings::{
    AD_ZONES, AdBlockNotice, AdZoneConfig, AdsConfig, AdvancedSettings, Genre, Genres, Page,
    Pages, PermalinkSettings, SeoEntry, SeoSettings, SiteSettings, SitemapSettings, SliderConfig,
    Sliders,
};
use crate::services::content_service::new_id;
use crate::services::settings_service::{SettingsError, SettingsService};
use crate::services::slug::slugify;
use crate::store::DocumentStore;

pub struct DocumentSettingsService {
    store: DocumentStore,
}

impl DocumentSettingsService {
    #[must_use]
    pub const fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    async fn get<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, SettingsError> {
        Ok(self.store.load_or_default(key).await?)
    }

    async fn put<T: Serialize + Sync>(&self, key: &str, value: T) -> Result<T, SettingsError> {
        self.store.save(key, &value).await?;
        info!("Saved {}", key);
        Ok(value)
    }

    async fn edit_zone<F>(&self, zone: &str, f: F) -> Result<AdZoneConfig, SettingsError>
    where
        F: FnOnce(&mut AdZoneConfig) + Send,
    {
        self.store
            .update(storage_keys::ADS, |ads: &mut AdsConfig| {
                if !AD_ZONES.contains(&zone) && ads.zone(zone).is_none() {
                    return Err(SettingsError::NotFound {
                        kind: "Ad zone",
                        id: zone.to_string(),
                    });
                }
                let config = ads.zone_mut(zone);
                f(config);
                Ok(config.clone())
            })
            .await
    }
}

fn delete_by_id<T>(items: &mut Vec<T>, ids: &[String], id_of: impl Fn(&T) -> &str) -> usize {
    let before = items.len();
    items.retain(|item| !ids.iter().any(|id| id == id_of(item)));
    before - items.len()
}

#[async_trait]
impl SettingsService for DocumentSettingsService {
    async fn genres(&self) -> Result<Vec<Genre>, SettingsError> {
        Ok(self.get::<Genres>(storage_keys::GENRES).await?.0)
    }

    async fn save_genre(&self, mut genre: Genre) -> Result<Genre, SettingsError> {
        genre.name = genre.name.trim().to_string();
        if genre.name.is_empty() {
            return Err(SettingsError::Validation("genre name is required".to_string()));
        }
        if genre.slug.as_deref().is_none_or(str::is_empty) {
            genre.slug = Some(slugify(&genre.name));
        }

        self.store
            .update(storage_keys::GENRES, move |genres: &mut Genres| {
                match genres.0.iter_mut().find(|g| !genre.id.is_empty() && g.id == genre.id) {
                    Some(existing) => *existing = genre.clone(),
                    None => {
                        if genre.id.is_empty() {
                            genre.id = new_id();
                        }
                        genres.0.push(genre.clone());
                    }
                }
                Ok(genre)
            })
            .await
    }

    async fn delete_genres(&self, ids: &[String]) -> Result<usize, SettingsError> {
        self.store
            .update(storage_keys::GENRES, |genres: &mut Genres| {
                Ok(delete_by_id(&mut genres.0, ids, |g| g.id.as_str()))
            })
            .await
    }

    async fn pages(&self) -> Result<Vec<Page>, SettingsError> {
        Ok(self.get::<Pages>(storage_keys::PAGES).await?.0)
    }

    async fn save_page(&self, mut page: Page) -> Result<Page, SettingsError> {
        page.title = page.title.trim().to_string();
        if page.title.is_empty() {
            return Err(SettingsError::Validation("page title is required".to_string()));
        }
        if page.slug.is_empty() {
            page.slug = slugify(&page.title);
        }

        self.store
            .update(storage_keys::PAGES, move |pages: &mut Pages| {
                match pages.0.iter_mut().find(|p| !page.id.is_empty() && p.id == page.id) {
                    Some(existing) => *existing = page.clone(),
                    None => {
                        if page.id.is_empty() {
                            page.id = new_id();
                        }
                        pages.0.push(page.clone());
                    }
                }
                Ok(page)
            })
            .await
    }

    async fn delete_pages(&self, ids: &[String]) -> Result<usize, SettingsError> {
        self.store
            .update(storage_keys::PAGES, |pages: &mut Pages| {
                Ok(delete_by_id(&mut pages.0, ids, |p| p.id.as_str()))
            })
            .await
    }

    async fn sliders(&self) -> Result<Vec<SliderConfig>, SettingsError> {
        Ok(self.get::<Sliders>(storage_keys::SLIDERS).await?.0)
    }

    async fn update_slider(&self, slider: SliderConfig) -> Result<SliderConfig, SettingsError> {
        self.store
            .update(storage_keys::SLIDERS, move |sliders: &mut Sliders| {
                let existing = sliders
                    .0
                    .iter_mut()
                    .find(|s| s.id == slider.id)
                    .ok_or_else(|| SettingsError::NotFound {
                        kind: "Slider",
                        id: slider.id.clone(),
                    })?;
                *existing = slider.clone();
                Ok(slider)
            })
            .await
    }

    async fn ads(&self) -> Result<AdsConfig, SettingsError> {
        Ok(self
            .get::<AdsConfig>(storage_keys::ADS)
            .await?
            .with_known_zones())
    }

    async fn replace_ads(&self, ads: AdsConfig) -> Result<AdsConfig, SettingsError> {
        self.put(storage_keys::ADS, ads.with_known_zones()).await
    }

    async fn update_zone(
        &self,
        zone: &str,
        config: AdZoneConfig,
    ) -> Result<AdZoneConfig, SettingsError> {
        self.edit_zone(zone, move |existing| *existing = config).await
    }

    async fn toggle_zone(&self, zone: &str) -> Result<AdZoneConfig, SettingsError> {
        self.edit_zone(zone, |existing| existing.enabled = !existing.enabled)
            .await
    }

    async fn clear_zone(&self, zone: &str) -> Result<AdZoneConfig, SettingsError> {
        self.edit_zone(zone, |existing| {
            existing.desktop.clear();
            existing.mobile.clear();
        })
        .await
    }

    async fn adblock(&self) -> Result<AdBlockNotice, SettingsError> {
        self.get(storage_keys::ADBLOCK).await
    }

    async fn set_adblock(&self, notice: AdBlockNotice) -> Result<AdBlockNotice, SettingsError> {
        self.put(storage_keys::ADBLOCK, notice).await
    }

    async fn permalinks(&self) -> Result<PermalinkSettings, SettingsError> {
        self.get(storage_keys::PERMALINKS).await
    }

    async fn set_permalinks(
        &self,
        permalinks: PermalinkSettings,
    ) -> Result<PermalinkSettings, SettingsError> {
        self.put(storage_keys::PERMALINKS, permalinks).await
    }

    async fn advanced(&self) -> Result<AdvancedSettings, SettingsError> {
        self.get(storage_keys::ADVANCED).await
    }

    async fn set_advanced(
        &self,
        advanced: AdvancedSettings,
    ) -> Result<AdvancedSettings, SettingsError> {
        self.put(storage_keys::ADVANCED, advanced).await
    }

    async fn site(&self) -> Result<SiteSettings, SettingsError> {
        self.get(storage_keys::SITE).await
    }

    async fn set_site(&self, site: SiteSettings) -> Result<SiteSettings, SettingsError> {
        if site.site_name.trim().is_empty() {
            return Err(SettingsError::Validation("site name is required".to_string()));
        }
        self.put(storage_keys::SITE, site).await
    }

    async fn seo(&self) -> Result<SeoSettings, SettingsError> {
        self.get(storage_keys::SEO).await
    }

    async fn set_seo(&self, seo: SeoSettings) -> Result<SeoSettings, SettingsError> {
        self.put(storage_keys::SEO, seo).await
    }

    async fn render_seo(
        &self,
        page: &str,
        vars: &BTreeMap<String, String>,
    ) -> Result<SeoEntry, SettingsError> {
        self.seo()
            .await?
            .render(page, vars)
            .ok_or_else(|| SettingsError::NotFound {
                kind: "SEO page",
                id: page.to_string(),
            })
    }

    async fn sitemap(&self) -> Result<SitemapSettings, SettingsError> {
        self.get(storage_keys::SITEMAP).await
    }

    async fn set_sitemap(
        &self,
        sitemap: SitemapSettings,
    ) -> Result<SitemapSettings, SettingsError> {
        self.put(storage_keys::SITEMAP, sitemap).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> DocumentSettingsService {
        DocumentSettingsService::new(DocumentStore::in_memory())
    }

    #[tokio::test]
    async fn test_genre_crud() {
        let svc = service();
        assert_eq!(svc.genres().await.unwrap().len(), 12);

        let created = svc
            .save_genre(Genre {
                name: "Science Fiction".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.slug.as_deref(), Some("science-fiction"));
        assert_eq!(svc.genres().await.unwrap().len(), 13);

        let renamed = svc
            .save_genre(Genre {
                id: "1".to_string(),
                name: "Action!".to_string(),
                slug: Some("action".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(renamed.id, "1");
        let genres = svc.genres().await.unwrap();
        assert_eq!(genres[0].name, "Action!");
        assert_eq!(genres.len(), 13);

        let removed = svc
            .delete_genres(&["1".to_string(), created.id])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(svc.genres().await.unwrap().len(), 11);

        assert!(matches!(
            svc.save_genre(Genre::default()).await,
            Err(SettingsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_pages_and_sliders() {
        let svc = service();
        let page = svc
            .save_page(Page {
                title: "Mentions Légales".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.slug, "mentions-lgales");
        assert_eq!(svc.pages().await.unwrap().len(), 7);
        assert_eq!(svc.delete_pages(&[page.id]).await.unwrap(), 1);

        let mut slider = svc.sliders().await.unwrap()[0].clone();
        slider.limit = 12;
        slider.is_active = false;
        svc.update_slider(slider).await.unwrap();
        let sliders = svc.sliders().await.unwrap();
        let stored = &sliders[0];
        assert_eq!(stored.limit, 12);
        assert!(!stored.is_active);

        let unknown = SliderConfig {
            id: "99".to_string(),
            ..stored.clone()
        };
        assert!(matches!(
            svc.update_slider(unknown).await,
            Err(SettingsError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_zone_editing() {
        let svc = service();
        assert_eq!(svc.ads().await.unwrap().0.len(), AD_ZONES.len());

        svc.update_zone(
            "topList",
            AdZoneConfig {
                desktop: "<div>d</div>".to_string(),
                mobile: "<div>m</div>".to_string(),
                enabled: true,
            },
        )
        .await
        .unwrap();

        let toggled = svc.toggle_zone("topList").await.unwrap();
        assert!(!toggled.enabled);

        let cleared = svc.clear_zone("topList").await.unwrap();
        assert!(cleared.desktop.is_empty() && cleared.mobile.is_empty());
        assert!(!cleared.enabled);

        assert!(matches!(
            svc.toggle_zone("nowhere").await,
            Err(SettingsError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_site_documents() {
        let svc = service();
        assert_eq!(svc.site().await.unwrap().site_name, "PLANET STREAM");

        let mut site = SiteSettings::default();
        site.maintenance_mode = true;
        svc.set_site(site).await.unwrap();
        assert!(svc.site().await.unwrap().maintenance_mode);

        site = SiteSettings {
            site_name: " ".to_string(),
            ..SiteSettings::default()
        };
        assert!(svc.set_site(site).await.is_err());

        let mut vars = BTreeMap::new();
        vars.insert("search".to_string(), "naruto".to_string());
        let rendered = svc.render_seo("search", &vars).await.unwrap();
        assert_eq!(rendered.title, "naruto Movies & TV Shows — Watchug");
        assert!(svc.render_seo("missing", &vars).await.is_err());
    }
}
