pub mod storage_keys {

    pub const CONTENT: &str = "planet_streaming_content";

    pub const ADS: &str = "planet_streaming_ads";

    pub const ADBLOCK: &str = "planet_streaming_adblock";

    pub const GENRES: &str = "planet_streaming_genres";

    pub const PAGES: &str = "planet_streaming_pages";

    pub const SLIDERS: &str = "planet_streaming_sliders";

    pub const PERMALINKS: &str = "planet_streaming_permalinks";

    pub const ADVANCED: &str = "planet_streaming_advanced";

    pub const SITE: &str = "planet_streaming_site";

    pub const SEO: &str = "planet_streaming_seo";

    pub const SITEMAP: &str = "planet_streaming_sitemap";

    pub const ALL: &[&str] = &[
        CONTENT, ADS, ADBLOCK, GENRES, PAGES, SLIDERS, PERMALINKS, ADVANCED, SITE, SEO, SITEMAP,
    ];
}

pub mod placeholders {

    pub const SIDEBAR_IMAGE: &str =
        "https://images.unsplash.com/photo-1542751371-adc38448a05e?q=80&w=2070&auto=format&fit=crop";

    pub const PLAYER_INSIDE_IMAGE: &str =
        "https://images.unsplash.com/photo-1550745165-9bc0b252726f?q=80&w=2070&auto=format&fit=crop";

    pub const MOBILE_IMAGE: &str =
        "https://images.unsplash.com/photo-1614850523459-c2f4c699c52e?q=80&w=2070&auto=format&fit=crop";

    pub const BANNER_IMAGE: &str =
        "https://images.unsplash.com/photo-1614850523296-d8c1af93d400?q=80&w=2070&auto=format&fit=crop";

    pub const POSTER_FALLBACK: &str = "https://picsum.photos/seed";
}

pub mod calendar {

    /// Weekly board columns, Monday first, with their day index (0 = Sunday).
    pub const WEEK_COLUMNS: &[(&str, u8)] = &[
        ("LUNDI", 1),
        ("MARDI", 2),
        ("MERCREDI", 3),
        ("JEUDI", 4),
        ("VENDREDI", 5),
        ("SAMEDI", 6),
        ("DIMANCHE", 0),
    ];

    pub const MONTHS: &[&str] = &[
        "JANVIER",
        "FÉVRIER",
        "MARS",
        "AVRIL",
        "MAI",
        "JUIN",
        "JUILLET",
        "AOÛT",
        "SEPTEMBRE",
        "OCTOBRE",
        "NOVEMBRE",
        "DÉCEMBRE",
    ];
}

pub mod limits {

    pub const RECOMMENDATIONS: usize = 4;

    pub const CAST_SIZE: usize = 5;

    pub const MANGA_MOCK_CHAPTERS: u32 = 12;

    pub const TOP_GENRES: usize = 6;

    pub const TOP_LANGUAGES: usize = 4;

    pub const TOP_VIEWED: usize = 5;

    /// Episodes edited within this many days count as recent.
    pub const LATEST_EPISODE_WINDOW_DAYS: i64 = 10;

    pub const NEW_EPISODE_HOURS: i64 = 6;

    /// Upper bound on episodes created by one bulk add.
    pub const MAX_BULK_EPISODES: u32 = 2000;

    /// Scope/view pairs remembered by the view-load guard.
    pub const SEQUENCER_SLOTS: usize = 4096;
}
