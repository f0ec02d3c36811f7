//! Domain service for the admin settings documents: genres, pages, sliders,
//! ad zones and the various site-wide toggles.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::settings::{
    AdBlockNotice, AdZoneConfig, AdsConfig, AdvancedSettings, Genre, Page, PermalinkSettings,
    SeoEntry, SeoSettings, SiteSettings, SitemapSettings, SliderConfig,
};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[async_trait::async_trait]
pub trait SettingsService: Send + Sync {
    async fn genres(&self) -> Result<Vec<Genre>, SettingsError>;

    /// Replaces the genre with the same id, or appends it with a new id.
    async fn save_genre(&self, genre: Genre) -> Result<Genre, SettingsError>;

    async fn delete_genres(&self, ids: &[String]) -> Result<usize, SettingsError>;

    async fn pages(&self) -> Result<Vec<Page>, SettingsError>;

    async fn save_page(&self, page: Page) -> Result<Page, SettingsError>;

    async fn delete_pages(&self, ids: &[String]) -> Result<usize, SettingsError>;

    async fn sliders(&self) -> Result<Vec<SliderConfig>, SettingsError>;

    async fn update_slider(&self, slider: SliderConfig) -> Result<SliderConfig, SettingsError>;

    /// Every known zone is present in the returned configuration.
    async fn ads(&self) -> Result<AdsConfig, SettingsError>;

    async fn replace_ads(&self, ads: AdsConfig) -> Result<AdsConfig, SettingsError>;

    async fn update_zone(
        &self,
        zone: &str,
        config: AdZoneConfig,
    ) -> Result<AdZoneConfig, SettingsError>;

    async fn toggle_zone(&self, zone: &str) -> Result<AdZoneConfig, SettingsError>;

    /// Empties both payloads, keeping the enabled flag.
    async fn clear_zone(&self, zone: &str) -> Result<AdZoneConfig, SettingsError>;

    async fn adblock(&self) -> Result<AdBlockNotice, SettingsError>;

    async fn set_adblock(&self, notice: AdBlockNotice) -> Result<AdBlockNotice, SettingsError>;

    async fn permalinks(&self) -> Result<PermalinkSettings, SettingsError>;

    async fn set_permalinks(
        &self,
        permalinks: PermalinkSettings,
    ) -> Result<PermalinkSettings, SettingsError>;

    async fn advanced(&self) -> Result<AdvancedSettings, SettingsError>;

    async fn set_advanced(
        &self,
        advanced: AdvancedSettings,
    ) -> Result<AdvancedSettings, SettingsError>;

    async fn site(&self) -> Result<SiteSettings, SettingsError>;

    async fn set_site(&self, site: SiteSettings) -> Result<SiteSettings, SettingsError>;

    async fn seo(&self) -> Result<SeoSettings, SettingsError>;

    async fn set_seo(&self, seo: SeoSettings) -> Result<SeoSettings, SettingsError>;

    async fn render_seo(
        &self,
        page: &str,
        vars: &BTreeMap<String, String>,
    ) -> Result<SeoEntry, SettingsError>;

    async fn sitemap(&self) -> Result<SitemapSettings, SettingsError>;

    async fn set_sitemap(&self, sitemap: SitemapSettings)
    -> Result<SitemapSettings, SettingsError>;
}
