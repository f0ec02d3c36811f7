//! Release calendar projection.
//!
//! Weekly entries become episodes on a Monday-first board for the viewed
//! week; monthly entries are placed on a twelve-column year board.

use chrono::{DateTime, Datelike, Duration, NaiveDate};
use serde::Serialize;
use tracing::warn;

use crate::constants::calendar::{MONTHS, WEEK_COLUMNS};
use crate::models::movie::{ContentType, Movie};
use crate::models::planning::PlanningEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanningFilter {
    #[default]
    Tous,
    Animes,
    Films,
    Vostfr,
    Vf,
}

impl PlanningFilter {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TOUS" | "" => Some(Self::Tous),
            "ANIMES" => Some(Self::Animes),
            "FILMS" => Some(Self::Films),
            "VOSTFR" => Some(Self::Vostfr),
            "VF" => Some(Self::Vf),
            _ => None,
        }
    }

    const fn mode(self) -> PlanningMode {
        match self {
            Self::Films => PlanningMode::Monthly,
            _ => PlanningMode::Weekly,
        }
    }

    fn accepts(self, movie: &Movie, entry: &PlanningEntry) -> bool {
        match self {
            Self::Tous => true,
            Self::Animes => movie.is_type(ContentType::Anime),
            Self::Films => movie.is_type(ContentType::Movie),
            Self::Vostfr => entry.language().contains("VO"),
            Self::Vf => entry.language().contains("VF"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanningMode {
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub movie: Movie,
    pub entry: PlanningEntry,
    /// Day index (0 = Sunday) in weekly mode, month index in monthly mode.
    pub column: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub id: u8,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Today's column (weekly, current week only) or the current month.
    pub is_current: bool,
    pub items: Vec<Projection>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningBoard {
    pub mode: PlanningMode,
    pub week_offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_start: Option<NaiveDate>,
    pub columns: Vec<BoardColumn>,
}

impl PlanningBoard {
    pub fn projections(&self) -> impl Iterator<Item = &Projection> {
        self.columns.iter().flat_map(|c| c.items.iter())
    }
}

/// Monday of the week containing `date`.
#[must_use]
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Accepts a bare date or a full RFC 3339 timestamp.
#[must_use]
pub fn parse_release_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.date_naive()))
        .or_else(|| {
            value
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

/// Start date assumed for weekly titles without a usable `releaseDate`.
#[must_use]
pub fn undated_release() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, 1)
}

/// Leading integer of a label such as "12" or "12 épisodes".
#[must_use]
pub fn leading_number(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

pub struct PlanningProjector {
    today: NaiveDate,
    fallback_total: i64,
}

impl PlanningProjector {
    #[must_use]
    pub fn new(today: NaiveDate, fallback_total: u32) -> Self {
        Self {
            today,
            fallback_total: i64::from(fallback_total),
        }
    }

    /// `None` when the offset leaves the representable calendar.
    #[must_use]
    pub fn viewed_monday(&self, week_offset: i64) -> Option<NaiveDate> {
        let days = week_offset.checked_mul(7).and_then(Duration::try_days)?;
        monday_of(self.today).checked_add_signed(days)
    }

    fn total_episodes(&self, movie: &Movie) -> i64 {
        movie
            .total_episodes_count
            .as_deref()
            .and_then(leading_number)
            .unwrap_or(self.fallback_total)
    }

    fn fallback_episode(movie: &Movie) -> i64 {
        movie
            .episode
            .as_deref()
            .and_then(leading_number)
            .filter(|n| *n != 0)
            .unwrap_or(1)
    }

    /// Episode airing in the viewed week, `None` when the title is not on air
    /// that week. Undated titles count from [`undated_release`] and stay
    /// visible every week, showing their own episode counter once that count
    /// is out of range.
    #[must_use]
    pub fn weekly_episode(&self, movie: &Movie, week_offset: i64) -> Option<i64> {
        let release = movie.release_date.as_deref().and_then(|raw| {
            let parsed = parse_release_date(raw);
            if parsed.is_none() {
                warn!(
                    "Unparsable release date '{}' for '{}', showing it every week",
                    raw, movie.title
                );
            }
            parsed
        });

        let undated = release.is_none();
        let release = release.or_else(undated_release)?;

        let weeks = (self.viewed_monday(week_offset)? - monday_of(release))
            .num_days()
            .div_euclid(7);
        let episode = weeks + 1;

        if (1..=self.total_episodes(movie)).contains(&episode) {
            Some(episode)
        } else if undated {
            Some(Self::fallback_episode(movie))
        } else {
            None
        }
    }

    #[must_use]
    pub fn project(
        &self,
        movies: &[Movie],
        week_offset: i64,
        filter: PlanningFilter,
        search: Option<&str>,
    ) -> Vec<Projection> {
        let mode = filter.mode();
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        movies
            .iter()
            .filter(|m| m.in_planning_page)
            .flat_map(|movie| {
                movie.planning_entries.iter().filter_map(move |entry| {
                    let (column, episode_number) = match (mode, entry) {
                        (PlanningMode::Monthly, PlanningEntry::Monthly { month, .. }) => {
                            (*month, None)
                        }
                        (PlanningMode::Weekly, PlanningEntry::Weekly { day, .. }) => {
                            (*day, Some(self.weekly_episode(movie, week_offset)?))
                        }
                        _ => return None,
                    };

                    Some(Projection {
                        movie: movie.clone(),
                        entry: entry.clone(),
                        column,
                        episode_number,
                    })
                })
            })
            .filter(|p| {
                needle
                    .as_ref()
                    .is_none_or(|n| p.movie.title.to_lowercase().contains(n))
            })
            .filter(|p| filter.accepts(&p.movie, &p.entry))
            .collect()
    }

    /// `None` when the viewed week falls outside the representable calendar.
    #[must_use]
    pub fn board(
        &self,
        movies: &[Movie],
        week_offset: i64,
        filter: PlanningFilter,
        search: Option<&str>,
    ) -> Option<PlanningBoard> {
        let mode = filter.mode();
        let mut projections = self.project(movies, week_offset, filter, search);

        let mut take_column = |id: u8| -> Vec<Projection> {
            let (matching, rest): (Vec<_>, Vec<_>) =
                projections.drain(..).partition(|p| p.column == id);
            projections = rest;
            matching
        };

        match mode {
            PlanningMode::Weekly => {
                let monday = self.viewed_monday(week_offset)?;
                let columns = WEEK_COLUMNS
                    .iter()
                    .zip(0i64..)
                    .map(|(&(name, id), idx)| {
                        let date = monday.checked_add_signed(Duration::days(idx))?;
                        Some(BoardColumn {
                            id,
                            name,
                            date: Some(date),
                            is_current: week_offset == 0 && date == self.today,
                            items: take_column(id),
                        })
                    })
                    .collect::<Option<Vec<_>>>()?;

                Some(PlanningBoard {
                    mode,
                    week_offset,
                    week_start: Some(monday),
                    columns,
                })
            }
            PlanningMode::Monthly => {
                let current = self.today.month0();
                let columns = MONTHS
                    .iter()
                    .zip(0u8..)
                    .map(|(&name, id)| BoardColumn {
                        id,
                        name,
                        date: None,
                        is_current: u32::from(id) == current,
                        items: take_column(id),
                    })
                    .collect();

                Some(PlanningBoard {
                    mode,
                    week_offset,
                    week_start: None,
                    columns,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weekly(day: u8, language: &str) -> PlanningEntry {
        PlanningEntry::Weekly {
            day,
            time: "20h00".to_string(),
            language: language.to_string(),
        }
    }

    fn planned(title: &str, release: Option<&str>, total: Option<&str>) -> Movie {
        Movie {
            id: title.to_string(),
            title: title.to_string(),
            content_type: Some(ContentType::Anime),
            in_planning_page: true,
            release_date: release.map(str::to_string),
            total_episodes_count: total.map(str::to_string),
            planning_entries: vec![weekly(1, "VOSTFR")],
            ..Default::default()
        }
    }

    #[test]
    fn test_week_projection_counts_episodes() {
        let projector = PlanningProjector::new(date("2024-01-03"), 100);
        let movie = planned("Show", Some("2024-01-01"), Some("12"));

        assert_eq!(projector.weekly_episode(&movie, 0), Some(1));
        assert_eq!(projector.weekly_episode(&movie, 11), Some(12));
        assert_eq!(projector.weekly_episode(&movie, 12), None);
        assert_eq!(projector.weekly_episode(&movie, -1), None);
    }

    #[test]
    fn test_mid_week_release_counts_from_its_monday() {
        let projector = PlanningProjector::new(date("2024-01-08"), 100);
        let movie = planned("Show", Some("2024-01-07T18:00:00+00:00"), None);
        assert_eq!(projector.weekly_episode(&movie, 0), Some(2));
    }

    #[test]
    fn test_missing_or_invalid_total_falls_back() {
        let projector = PlanningProjector::new(date("2024-01-01"), 100);
        let movie = planned("Show", Some("2024-01-01"), Some("beaucoup"));
        assert_eq!(projector.weekly_episode(&movie, 99), Some(100));
        assert_eq!(projector.weekly_episode(&movie, 100), None);
    }

    #[test]
    fn test_no_release_date_is_always_visible() {
        let projector = PlanningProjector::new(date("2030-06-01"), 100);
        let mut movie = planned("Show", None, Some("3"));
        assert_eq!(projector.weekly_episode(&movie, 50), Some(1));

        movie.episode = Some("7".to_string());
        assert_eq!(projector.weekly_episode(&movie, 50), Some(7));

        movie.release_date = Some("not a date".to_string());
        assert_eq!(projector.weekly_episode(&movie, -3), Some(7));
    }

    #[test]
    fn test_undated_title_counts_from_default_start() {
        let projector = PlanningProjector::new(date("2024-01-10"), 100);
        let mut movie = planned("Show", None, Some("12"));
        movie.episode = Some("40".to_string());

        assert_eq!(projector.weekly_episode(&movie, 0), Some(2));
        assert_eq!(projector.weekly_episode(&movie, 10), Some(12));
        assert_eq!(projector.weekly_episode(&movie, 11), Some(40));
        assert_eq!(projector.weekly_episode(&movie, -5), Some(40));
    }

    #[test]
    fn test_out_of_calendar_offsets_do_not_panic() {
        let projector = PlanningProjector::new(date("2024-01-03"), 100);
        let movies = vec![
            planned("Dated", Some("2024-01-01"), Some("12")),
            planned("Undated", None, None),
        ];

        for offset in [10_000_000_000_000, i64::MAX, i64::MIN, -10_000_000_000_000] {
            assert!(projector.viewed_monday(offset).is_none());
            assert!(projector.board(&movies, offset, PlanningFilter::Tous, None).is_none());
            assert!(projector.project(&movies, offset, PlanningFilter::Tous, None).is_empty());
        }

        let films = projector.board(&movies, i64::MAX, PlanningFilter::Films, None);
        assert!(films.is_some());
    }

    #[test]
    fn test_board_weekly_columns() {
        let projector = PlanningProjector::new(date("2024-01-03"), 100);
        let movies = vec![planned("Show", Some("2024-01-01"), Some("12"))];

        let board = projector.board(&movies, 0, PlanningFilter::Tous, None).unwrap();
        assert_eq!(board.mode, PlanningMode::Weekly);
        assert_eq!(board.week_start, Some(date("2024-01-01")));
        assert_eq!(board.columns.len(), 7);
        assert_eq!(board.columns[0].name, "LUNDI");
        assert_eq!(board.columns[0].items.len(), 1);
        assert_eq!(board.columns[0].items[0].episode_number, Some(1));
        assert_eq!(board.columns[6].id, 0);
        assert_eq!(board.columns[6].date, Some(date("2024-01-07")));

        let current: Vec<_> = board.columns.iter().filter(|c| c.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].name, "MERCREDI");

        let next = projector.board(&movies, 1, PlanningFilter::Tous, None).unwrap();
        assert!(next.columns.iter().all(|c| !c.is_current));
    }

    #[test]
    fn test_filters_and_search() {
        let projector = PlanningProjector::new(date("2024-01-01"), 100);
        let mut vf = planned("Kaiju VF", Some("2024-01-01"), None);
        vf.planning_entries = vec![weekly(2, "VF")];
        let vo = planned("Frieren", Some("2024-01-01"), None);
        let mut series = planned("Série", Some("2024-01-01"), None);
        series.content_type = Some(ContentType::Series);
        let mut hidden = planned("Hidden", Some("2024-01-01"), None);
        hidden.in_planning_page = false;
        let movies = vec![vf, vo, series, hidden];

        let titles = |filter, search| -> Vec<String> {
            projector
                .project(&movies, 0, filter, search)
                .into_iter()
                .map(|p| p.movie.title)
                .collect()
        };

        assert_eq!(titles(PlanningFilter::Tous, None).len(), 3);
        assert_eq!(titles(PlanningFilter::Vf, None), vec!["Kaiju VF"]);
        assert_eq!(titles(PlanningFilter::Vostfr, None), vec!["Frieren", "Série"]);
        assert_eq!(titles(PlanningFilter::Animes, None), vec!["Kaiju VF", "Frieren"]);
        assert_eq!(titles(PlanningFilter::Tous, Some("FRIE")), vec!["Frieren"]);
    }

    #[test]
    fn test_monthly_board_for_films() {
        let projector = PlanningProjector::new(date("2024-03-15"), 100);
        let film = Movie {
            title: "Dune".to_string(),
            content_type: Some(ContentType::Movie),
            in_planning_page: true,
            planning_entries: vec![
                PlanningEntry::Monthly {
                    month: 2,
                    time: "20h00".to_string(),
                    language: "VF".to_string(),
                },
                weekly(3, "VF"),
            ],
            ..Default::default()
        };

        let board = projector.board(&[film], 0, PlanningFilter::Films, None).unwrap();
        assert_eq!(board.mode, PlanningMode::Monthly);
        assert_eq!(board.columns.len(), 12);
        assert_eq!(board.columns[2].name, "MARS");
        assert!(board.columns[2].is_current);
        assert_eq!(board.columns[2].items.len(), 1);
        assert_eq!(board.projections().count(), 1);
        assert!(board.columns[2].items[0].episode_number.is_none());
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("12"), Some(12));
        assert_eq!(leading_number(" 24 épisodes"), Some(24));
        assert_eq!(leading_number("-3"), Some(-3));
        assert_eq!(leading_number("Chap. 4"), None);
        assert_eq!(leading_number(""), None);
    }
}
