use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::planning::{PlanningEntry, deserialize_planning_entries, settle_legacy_entries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Series,
    Anime,
    Manga,
}

impl ContentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Anime => "anime",
            Self::Manga => "manga",
        }
    }

    /// Series and anime share the episodic video layout.
    #[must_use]
    pub const fn is_episodic_video(self) -> bool {
        matches!(self, Self::Series | Self::Anime)
    }
}

/// A catalogue entry, either remote (TMDB / MAL) or managed by the admin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase", default)]
pub struct Movie {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<String>,
    pub title: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub year: i32,
    pub rating: String,
    pub duration: String,
    pub genre: Vec<String>,
    pub description: String,
    pub poster_url: String,
    pub backdrop_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
    pub director: String,
    pub cast: Vec<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub popularity: f64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    pub seasons: Vec<Season>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub langue: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast_day: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast_time: Option<String>,
    #[serde(deserialize_with = "deserialize_planning_entries")]
    pub planning_entries: Vec<PlanningEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub videos: Vec<VideoSource>,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub is_anime_series: bool,
    pub show_in_latest_episodes: bool,
    pub is_today_highlight: bool,
    pub is_recent_addition: bool,
    pub in_planning_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_episodes_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl Serialize for Movie {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Self::serialize(self, serializer)
    }
}

/// Legacy planning entries carrying both `day` and `month` are settled
/// against the record's `type` before the fields are read.
impl<'de> Deserialize<'de> for Movie {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error as _;

        let mut value = serde_json::Value::deserialize(deserializer)?;
        if let Some(record) = value.as_object_mut() {
            let content_type = record
                .get("type")
                .and_then(|t| ContentType::deserialize(t).ok());
            if let Some(entries) = record.get_mut("planningEntries") {
                settle_legacy_entries(entries, content_type);
            }
        }

        Self::deserialize(value).map_err(D::Error::custom)
    }
}

impl Movie {
    /// Normalized identifier: `tmdbId` when set, falling back to `id`.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.tmdb_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| Some(self.id.as_str()).filter(|id| !id.is_empty()))
    }

    /// Two records refer to the same title when they share a non-empty
    /// `tmdbId` or a non-empty `id`.
    #[must_use]
    pub fn same_title(&self, other: &Self) -> bool {
        let tmdb_match = matches!(
            (self.tmdb_id.as_deref(), other.tmdb_id.as_deref()),
            (Some(a), Some(b)) if !a.is_empty() && a == b
        );
        tmdb_match || (!self.id.is_empty() && self.id == other.id)
    }

    /// Matches a bare identifier the way admin removal and lookup do.
    #[must_use]
    pub fn has_id(&self, id: &str) -> bool {
        !id.is_empty() && (self.id == id || self.tmdb_id.as_deref() == Some(id))
    }

    #[must_use]
    pub fn is_type(&self, content_type: ContentType) -> bool {
        self.content_type == Some(content_type)
    }

    /// A planning-only item is hidden from general listings unless another
    /// promotional flag is set.
    #[must_use]
    pub const fn is_planning_only(&self) -> bool {
        self.in_planning_page
            && !self.is_pinned
            && !self.show_in_latest_episodes
            && !self.is_today_highlight
            && !self.is_recent_addition
    }

    #[must_use]
    pub fn season(&self, number: u32) -> Option<&Season> {
        self.seasons.iter().find(|s| s.number == number)
    }

    pub fn season_mut(&mut self, number: u32) -> Option<&mut Season> {
        self.seasons.iter_mut().find(|s| s.number == number)
    }

    #[must_use]
    pub fn has_episodes(&self) -> bool {
        self.seasons.iter().any(|s| !s.episodes.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Season {
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub number: u32,
    pub title: String,
    pub episodes: Vec<Episode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Season {
    #[must_use]
    pub fn max_episode_number(&self) -> Option<u32> {
        self.episodes.iter().map(|e| e.number).max()
    }

    /// Position of the episode identified by `id` or, failing that, `number`.
    #[must_use]
    pub fn position_of(&self, id: &str, number: u32) -> Option<usize> {
        self.episodes
            .iter()
            .position(|e| (!id.is_empty() && e.id == id) || e.number == number)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Episode {
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub number: u32,
    pub title: String,
    pub thumbnail_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub links: Vec<Link>,
    pub videos: Vec<VideoSource>,
    pub images: Vec<String>,
    pub langue: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Epoch milliseconds of the last admin edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Link {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub langue: Option<String>,
    pub quality: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub url: String,
    pub langue: String,
    pub quality: String,
}
