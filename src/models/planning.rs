//! Scheduled-release annotations attached to managed titles.
//!
//! Entries are stored as a tagged variant. Documents written by the old
//! storefront used a single shape with optional `day` and `month` fields;
//! those are upgraded on load.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;

use super::movie::ContentType;

pub const DEFAULT_BROADCAST_TIME: &str = "20h00";
pub const DEFAULT_BROADCAST_LANGUAGE: &str = "VF";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "schedule",
    rename_all = "lowercase",
    try_from = "RawPlanningEntry"
)]
pub enum PlanningEntry {
    /// `day` is 0 (Sunday) through 6 (Saturday).
    Weekly {
        day: u8,
        time: String,
        language: String,
    },
    /// `month` is 0 (January) through 11 (December).
    Monthly {
        month: u8,
        time: String,
        language: String,
    },
}

impl PlanningEntry {
    /// Default entry the admin editor adds for a title of the given type.
    #[must_use]
    pub fn default_for(content_type: ContentType) -> Self {
        if content_type == ContentType::Movie {
            Self::Monthly {
                month: 0,
                time: DEFAULT_BROADCAST_TIME.to_string(),
                language: DEFAULT_BROADCAST_LANGUAGE.to_string(),
            }
        } else {
            Self::Weekly {
                day: 1,
                time: DEFAULT_BROADCAST_TIME.to_string(),
                language: DEFAULT_BROADCAST_LANGUAGE.to_string(),
            }
        }
    }

    #[must_use]
    pub fn time(&self) -> &str {
        match self {
            Self::Weekly { time, .. } | Self::Monthly { time, .. } => time,
        }
    }

    #[must_use]
    pub fn language(&self) -> &str {
        match self {
            Self::Weekly { language, .. } | Self::Monthly { language, .. } => language,
        }
    }

    #[must_use]
    pub const fn day(&self) -> Option<u8> {
        match self {
            Self::Weekly { day, .. } => Some(*day),
            Self::Monthly { .. } => None,
        }
    }

    #[must_use]
    pub const fn month(&self) -> Option<u8> {
        match self {
            Self::Monthly { month, .. } => Some(*month),
            Self::Weekly { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_weekly(&self) -> bool {
        matches!(self, Self::Weekly { .. })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanningEntryError {
    #[error("planning entry has neither a day nor a month")]
    Unscheduled,

    #[error("day {0} is outside 0-6")]
    DayOutOfRange(i64),

    #[error("month {0} is outside 0-11")]
    MonthOutOfRange(i64),

    #[error("unknown schedule kind '{0}'")]
    UnknownSchedule(String),
}

/// Wire shape accepted on load: either the tagged form or the legacy one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawPlanningEntry {
    schedule: Option<String>,
    day: Option<i64>,
    month: Option<i64>,
    time: String,
    language: String,
}

fn checked_day(day: i64) -> Result<u8, PlanningEntryError> {
    u8::try_from(day)
        .ok()
        .filter(|d| *d <= 6)
        .ok_or(PlanningEntryError::DayOutOfRange(day))
}

fn checked_month(month: i64) -> Result<u8, PlanningEntryError> {
    u8::try_from(month)
        .ok()
        .filter(|m| *m <= 11)
        .ok_or(PlanningEntryError::MonthOutOfRange(month))
}

impl TryFrom<RawPlanningEntry> for PlanningEntry {
    type Error = PlanningEntryError;

    fn try_from(raw: RawPlanningEntry) -> Result<Self, Self::Error> {
        let RawPlanningEntry {
            schedule,
            day,
            month,
            time,
            language,
        } = raw;

        let weekly = match schedule.as_deref() {
            Some("weekly") => true,
            Some("monthly") => false,
            Some(other) => return Err(PlanningEntryError::UnknownSchedule(other.to_string())),
            None => match (day, month) {
                (Some(_), Some(_)) => {
                    warn!("Planning entry sets both day and month, keeping the weekly day");
                    true
                }
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => return Err(PlanningEntryError::Unscheduled),
            },
        };

        if weekly {
            let day = checked_day(day.ok_or(PlanningEntryError::Unscheduled)?)?;
            Ok(Self::Weekly {
                day,
                time,
                language,
            })
        } else {
            let month = checked_month(month.ok_or(PlanningEntryError::Unscheduled)?)?;
            Ok(Self::Monthly {
                month,
                time,
                language,
            })
        }
    }
}

/// Old documents sometimes carry both `day` and `month` on an untagged
/// entry. Films keep the month and every other type keeps the day. Without
/// a known type the entry is left for the weekly default.
pub fn settle_legacy_entries(entries: &mut serde_json::Value, content_type: Option<ContentType>) {
    let Some(content_type) = content_type else {
        return;
    };
    let Some(entries) = entries.as_array_mut() else {
        return;
    };

    let drop_key = if content_type == ContentType::Movie { "day" } else { "month" };
    for entry in entries.iter_mut().filter_map(serde_json::Value::as_object_mut) {
        let ambiguous = !entry.contains_key("schedule")
            && entry.get("day").is_some_and(|v| !v.is_null())
            && entry.get("month").is_some_and(|v| !v.is_null());
        if ambiguous {
            entry.remove(drop_key);
        }
    }
}

/// Loads a list of entries, dropping the ones that cannot be scheduled.
pub fn deserialize_planning_entries<'de, D>(deserializer: D) -> Result<Vec<PlanningEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<RawPlanningEntry>> = Option::deserialize(deserializer)?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match PlanningEntry::try_from(entry) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Dropping planning entry: {}", e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<PlanningEntry, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_tagged_round_trip_shape() {
        let entry = PlanningEntry::default_for(ContentType::Anime);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["schedule"], "weekly");
        assert_eq!(json["day"], 1);
        assert_eq!(json["time"], "20h00");
        assert_eq!(parse(&json.to_string()).unwrap(), entry);
    }

    #[test]
    fn test_legacy_shapes_upgrade() {
        let weekly = parse(r#"{"day": 3, "time": "18h00", "language": "VOSTFR"}"#).unwrap();
        assert_eq!(weekly.day(), Some(3));

        let monthly = parse(r#"{"month": 11, "time": "20h00", "language": "VF"}"#).unwrap();
        assert_eq!(monthly.month(), Some(11));

        let both = parse(r#"{"day": 0, "month": 4, "time": "", "language": "VF"}"#).unwrap();
        assert_eq!(both.day(), Some(0));
        assert_eq!(both.month(), None);
    }

    #[test]
    fn test_rejects_unschedulable_entries() {
        assert!(parse(r#"{"time": "20h00", "language": "VF"}"#).is_err());
        assert!(parse(r#"{"day": 7, "time": "20h00", "language": "VF"}"#).is_err());
        assert!(parse(r#"{"month": -1, "time": "20h00", "language": "VF"}"#).is_err());
        assert!(parse(r#"{"schedule": "daily", "day": 1}"#).is_err());
    }

    #[test]
    fn test_list_drops_bad_entries() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(deserialize_with = "deserialize_planning_entries", default)]
            entries: Vec<PlanningEntry>,
        }

        let holder: Holder = serde_json::from_str(
            r#"{"entries": [{"day": 2, "time": "", "language": "VF"}, {"time": "x", "language": "VF"}]}"#,
        )
        .unwrap();
        assert_eq!(holder.entries.len(), 1);

        let empty: Holder = serde_json::from_str(r#"{"entries": null}"#).unwrap();
        assert!(empty.entries.is_empty());
    }

    #[test]
    fn test_settle_keeps_the_field_matching_the_type() {
        let ambiguous = serde_json::json!([
            {"day": 4, "month": 7, "time": "", "language": "VF"},
            {"schedule": "weekly", "day": 1, "month": 2, "time": "", "language": "VF"}
        ]);

        let mut film = ambiguous.clone();
        settle_legacy_entries(&mut film, Some(ContentType::Movie));
        assert!(film[0].get("day").is_none());
        assert_eq!(film[0]["month"], 7);
        assert_eq!(film[1]["day"], 1);

        let mut series = ambiguous.clone();
        settle_legacy_entries(&mut series, Some(ContentType::Series));
        assert!(series[0].get("month").is_none());

        let mut unknown = ambiguous.clone();
        settle_legacy_entries(&mut unknown, None);
        assert_eq!(unknown, ambiguous);
    }

    #[test]
    fn test_movie_default_is_monthly() {
        let entry = PlanningEntry::default_for(ContentType::Movie);
        assert_eq!(entry.month(), Some(0));
        assert_eq!(entry.language(), "VF");
    }
}
