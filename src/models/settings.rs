//! Admin-managed configuration documents.
//!
//! Each type maps to one document in the store; the `Default` impls carry
//! the values a fresh install starts with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ad placements rendered by the storefront.
pub const AD_ZONES: &[&str] = &[
    "headerBottom",
    "topList",
    "bottomList",
    "singleMovieTop",
    "singleMovieBottom",
    "singleSeriesTop",
    "singleSeriesBottom",
    "singleSeasonTop",
    "singleSeasonBottom",
    "singleEpisodeTop",
    "singleEpisodeBottom",
    "singlePlayerTop",
    "singlePlayerBottom",
    "singlePlayerInside",
    "sidebarLeft",
    "sidebarRight",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Genre {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub show_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[must_use]
pub fn default_genres() -> Vec<Genre> {
    [
        "Action",
        "Adventure",
        "Animation",
        "Comedy",
        "Crime",
        "Documentary",
        "Drama",
        "Family",
        "Fantasy",
        "History",
        "Horror",
        "Music",
    ]
    .iter()
    .enumerate()
    .map(|(i, name)| Genre {
        id: (i + 1).to_string(),
        name: (*name).to_string(),
        slug: Some(name.to_lowercase()),
        ..Default::default()
    })
    .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub show_featured: bool,
}

#[must_use]
pub fn default_pages() -> Vec<Page> {
    [
        ("Accueil", "home", "Page d'accueil du site"),
        ("Catalogue", "catalogue", "Catalogue complet des films et séries"),
        ("Planning", "planning", "Planning des sorties hebdomadaires"),
        ("Films", "films", "Liste des films en streaming"),
        ("Séries", "series", "Liste des séries en streaming"),
        ("Manga", "manga", "Liste des scans manga"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (title, slug, description))| Page {
        id: (i + 1).to_string(),
        title: (*title).to_string(),
        slug: (*slug).to_string(),
        description: Some((*description).to_string()),
        ..Default::default()
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderConfig {
    pub id: String,
    pub name: String,
    pub heading: String,
    pub limit: u32,
    pub is_active: bool,
}

#[must_use]
pub fn default_sliders() -> Vec<SliderConfig> {
    [
        "Slider Derniers épisodes",
        "Slider Episode Calendar",
        "Slider Aujourd'hui",
        "Slider Movies",
        "Slider MANGA",
        "Slider ANIMES",
        "Slider Les plus aimés",
        "Slider Top de la semaine",
    ]
    .iter()
    .enumerate()
    .map(|(i, name)| SliderConfig {
        id: (i + 1).to_string(),
        name: (*name).to_string(),
        heading: "Slider".to_string(),
        limit: 6,
        is_active: true,
    })
    .collect()
}

/// Stored genre list; a missing document means the stock genres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genres(pub Vec<Genre>);

impl Default for Genres {
    fn default() -> Self {
        Self(default_genres())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pages(pub Vec<Page>);

impl Default for Pages {
    fn default() -> Self {
        Self(default_pages())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sliders(pub Vec<SliderConfig>);

impl Default for Sliders {
    fn default() -> Self {
        Self(default_sliders())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdZoneConfig {
    pub desktop: String,
    pub mobile: String,
    pub enabled: bool,
}

impl Default for AdZoneConfig {
    fn default() -> Self {
        Self {
            desktop: String::new(),
            mobile: String::new(),
            enabled: true,
        }
    }
}

/// Zone name to payloads. Always holds every entry of [`AD_ZONES`] once
/// loaded through [`AdsConfig::with_known_zones`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdsConfig(pub BTreeMap<String, AdZoneConfig>);

impl AdsConfig {
    #[must_use]
    pub fn with_known_zones(mut self) -> Self {
        for zone in AD_ZONES {
            self.0.entry((*zone).to_string()).or_default();
        }
        self
    }

    #[must_use]
    pub fn zone(&self, zone: &str) -> Option<&AdZoneConfig> {
        self.0.get(zone)
    }

    pub fn zone_mut(&mut self, zone: &str) -> &mut AdZoneConfig {
        self.0.entry(zone.to_string()).or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdBlockNotice {
    pub enabled: bool,
    pub message: String,
    pub bg_color: String,
    pub sticker: String,
}

impl Default for AdBlockNotice {
    fn default() -> Self {
        Self {
            enabled: true,
            message: "👮Veuillez désactiver AdBlock pour nous soutenir ! 🥳".to_string(),
            bg_color: "#1e3a8a".to_string(),
            sticker: "Cute Cat".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermalinkSettings {
    pub category_prefix: String,
    pub tag_prefix: String,
    pub movie_path: String,
    pub series_path: String,
    pub season_path: String,
    pub episode_path: String,
    pub manga_path: String,
    pub scan_path: String,
    pub structure: String,
    pub custom_structure: String,
}

impl Default for PermalinkSettings {
    fn default() -> Self {
        Self {
            category_prefix: String::new(),
            tag_prefix: String::new(),
            movie_path: "film-vf-vostfr".to_string(),
            series_path: "anime".to_string(),
            season_path: "season".to_string(),
            episode_path: "episode".to_string(),
            manga_path: "manga".to_string(),
            scan_path: "scan".to_string(),
            structure: "postname".to_string(),
            custom_structure: "/%postname%/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedSettings {
    pub top_this_week: bool,
    pub show_featured_genres: bool,
    pub show_alt_title: bool,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            top_this_week: true,
            show_featured_genres: true,
            show_alt_title: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub site_name: String,
    pub site_tagline: String,
    pub site_logo: String,
    pub site_favicon: String,
    pub maintenance_mode: bool,
    pub allow_registration: bool,
    pub email_notifications: bool,
    pub default_language: String,
    pub accent_color: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "PLANET STREAM".to_string(),
            site_tagline: "Streaming Illimité - Films & Séries en HD".to_string(),
            site_logo: String::new(),
            site_favicon: String::new(),
            maintenance_mode: false,
            allow_registration: true,
            email_notifications: true,
            default_language: "VF".to_string(),
            accent_color: "#00A1FA".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoEntry {
    pub title: String,
    pub description: String,
}

/// Page key (`site`, `movie`, `genre`, ...) to title/description templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeoSettings(pub BTreeMap<String, SeoEntry>);

/// Variables the SEO templates may reference as `[name]`.
pub const SEO_PLACEHOLDERS: &[&str] = &[
    "title",
    "description",
    "release",
    "country",
    "genre",
    "sortable",
    "tag",
    "search",
    "username",
];

impl SeoSettings {
    /// Fills the templates of `page`. Placeholders without a value are
    /// removed.
    #[must_use]
    pub fn render(&self, page: &str, vars: &BTreeMap<String, String>) -> Option<SeoEntry> {
        let entry = self.0.get(page)?;

        let fill = |template: &str| {
            let mut out = template.to_string();
            for name in SEO_PLACEHOLDERS {
                let value = vars.get(*name).map_or("", String::as_str);
                out = out.replace(&format!("[{name}]"), value);
            }
            out.split_whitespace().collect::<Vec<_>>().join(" ")
        };

        Some(SeoEntry {
            title: fill(&entry.title),
            description: fill(&entry.description),
        })
    }
}

impl Default for SeoSettings {
    fn default() -> Self {
        let collection = "Watchug offers a wide collection of movies, including drama, comedy, action, sci-fi, a";
        let tv = "Watchug offers a wide collection of TV Shows, including drama, comedy, action, sci-!";
        let entries = [
            ("site", "Watch the Best Movies & TV Shows — Watchug", collection),
            (
                "browse",
                "Explore Best Movies & TV Shows — Watchug",
                "Unleash your cinematic curiosity with watchug extensive movie collection. Browse th",
            ),
            (
                "manga",
                "MANGA — Watchug",
                "Watchug offers a wide collection of manga, including drama, comedy, action, sci-fi, a",
            ),
            ("movies", "Explore Best Movies — Watchug", collection),
            ("tvShows", "Explore Best TV Shows — Watchug", tv),
            (
                "genre",
                "[genre] [sortable] Best Movies & TV Shows — Watchug",
                "[genre] Best Movies & TV Shows — Watchug",
            ),
            ("movie", "[title] Free Watch Movie — Watchug", "[description]"),
            ("tvShow", "[title] Watch Movie", "[description]"),
            ("scan", "[title] Watch scan", "[description]"),
            ("episode", "[title] Watch Movie", "[description]"),
            (
                "tag",
                "[tag] Movies & TV Shows — Watchug",
                "[tag] Movies & TV Shows — Watchug",
            ),
            (
                "search",
                "[search] Movies & TV Shows — Watchug",
                "[search] Movies & TV Shows — Watchug",
            ),
            ("trending", "Explore Trending Best TV Shows — Watchug", tv),
            ("topImdb", "Explore Top Imdb Best TV Shows — Watchug", tv),
            ("profile", "[username] — Watchug", "[username] — Watchug"),
            ("page", "[title] — Watchug", "[title] — Watchug"),
        ];

        Self(
            entries
                .iter()
                .map(|(key, title, description)| {
                    (
                        (*key).to_string(),
                        SeoEntry {
                            title: (*title).to_string(),
                            description: (*description).to_string(),
                        },
                    )
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapSettings {
    pub series: bool,
    pub seasons: bool,
    pub episodes: bool,
    pub films: bool,
    pub scan: bool,
    pub category: bool,
    pub post_tag: bool,
    pub pages: bool,
    #[serde(rename = "maxEntries")]
    pub max_entries: u32,
}

impl Default for SitemapSettings {
    fn default() -> Self {
        Self {
            series: true,
            seasons: true,
            episodes: true,
            films: false,
            scan: true,
            category: true,
            post_tag: true,
            pages: true,
            max_entries: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_zones_backfilled() {
        let mut partial = BTreeMap::new();
        partial.insert(
            "topList".to_string(),
            AdZoneConfig {
                desktop: "<div>ad</div>".to_string(),
                mobile: String::new(),
                enabled: false,
            },
        );

        let ads = AdsConfig(partial).with_known_zones();
        assert_eq!(ads.0.len(), AD_ZONES.len());
        assert!(!ads.zone("topList").unwrap().enabled);
        assert!(ads.zone("sidebarLeft").unwrap().enabled);
    }

    #[test]
    fn test_zone_without_enabled_flag_defaults_on() {
        let ads: AdsConfig =
            serde_json::from_str(r#"{"headerBottom": {"desktop": "x", "mobile": ""}}"#).unwrap();
        assert!(ads.zone("headerBottom").unwrap().enabled);
    }

    #[test]
    fn test_seo_render() {
        let seo = SeoSettings::default();
        let mut vars = BTreeMap::new();
        vars.insert("genre".to_string(), "Action".to_string());

        let genre = seo.render("genre", &vars).unwrap();
        assert_eq!(genre.title, "Action Best Movies & TV Shows — Watchug");

        vars.insert("title".to_string(), "Dune".to_string());
        vars.insert("description".to_string(), "Sable.".to_string());
        let movie = seo.render("movie", &vars).unwrap();
        assert_eq!(movie.title, "Dune Free Watch Movie — Watchug");
        assert_eq!(movie.description, "Sable.");

        assert!(seo.render("nope", &vars).is_none());
    }

    #[test]
    fn test_missing_lists_use_stock_entries() {
        assert_eq!(Genres::default().0.len(), 12);
        assert_eq!(Pages::default().0.len(), 6);
        let sliders: Sliders = serde_json::from_str("[]").unwrap();
        assert!(sliders.0.is_empty());
    }

    #[test]
    fn test_default_lists() {
        assert_eq!(default_genres().len(), 12);
        assert_eq!(default_genres()[0].slug.as_deref(), Some("action"));
        assert_eq!(default_pages()[2].slug, "planning");
        assert!(default_sliders().iter().all(|s| s.is_active && s.limit == 6));
        assert_eq!(SeoSettings::default().0.len(), 16);
    }
}
