//! Bulk link tools for the episode editor.
//!
//! Pasted text is split into blank-line separated chunks, one chunk per
//! episode. The two formatting helpers only rewrite the text; the actual
//! assignment happens in [`distribute`].

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::movie::{Season, VideoSource};
use crate::services::planning::leading_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistributionMode {
    #[default]
    Video,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkType {
    #[default]
    Online,
    Download,
}

impl LinkType {
    #[must_use]
    pub const fn source_label(self) -> &'static str {
        match self {
            Self::Online => "Embed link",
            Self::Download => "Download",
        }
    }
}

fn default_initial_episode() -> u32 {
    1
}

fn default_language() -> String {
    "VF".to_string()
}

fn default_quality() -> String {
    "HDLight".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributeRequest {
    pub season: u32,
    #[serde(default = "default_initial_episode")]
    pub initial_episode: u32,
    pub text: String,
    #[serde(default)]
    pub mode: DistributionMode,
    #[serde(default, rename = "type")]
    pub link_type: LinkType,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_quality")]
    pub quality: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributeReport {
    /// Episode numbers that received links.
    pub updated: Vec<u32>,
    /// Episode numbers with a chunk but no episode.
    pub skipped: Vec<u32>,
}

fn blank_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("Invalid regex"))
}

fn clean_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

/// Splits pasted text into per-episode link lists.
#[must_use]
pub fn split_chunks(text: &str) -> Vec<Vec<&str>> {
    blank_line()
        .split(text)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(clean_lines)
        .collect()
}

/// Inserts a blank line after every `per_episode` links.
#[must_use]
pub fn auto_distribute(text: &str, per_episode: usize) -> String {
    let per_episode = per_episode.max(1);
    let mut output = Vec::new();

    for (i, link) in clean_lines(text).into_iter().enumerate() {
        if i != 0 && i % per_episode == 0 {
            output.push("");
        }
        output.push(link);
    }

    output.join("\n")
}

/// Groups scan page URLs by chapter. The chapter is the second to last path
/// segment that starts with a number, so `.../12/03.jpg` lands in chapter 12.
/// Returns `None` when no URL has a recognisable chapter.
#[must_use]
pub fn smart_group_manga(text: &str) -> Option<String> {
    let mut groups: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut keys: Vec<&str> = Vec::new();

    for url in clean_lines(text) {
        let numeric: Vec<&str> = url
            .split('/')
            .filter(|part| leading_number(part).is_some())
            .collect();

        if numeric.len() < 2 {
            continue;
        }

        let chapter = numeric[numeric.len() - 2];
        groups
            .entry(chapter)
            .or_insert_with(|| {
                keys.push(chapter);
                Vec::new()
            })
            .push(url);
    }

    if keys.is_empty() {
        return None;
    }

    keys.sort_by_key(|k| leading_number(k).unwrap_or_default());

    Some(
        keys.iter()
            .map(|k| groups[k].join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n"),
    )
}

/// Assigns chunk *k* to episode `initial_episode + k` of `season`, stamping
/// each updated episode with `now_ms`.
pub fn distribute(season: &mut Season, request: &DistributeRequest, now_ms: i64) -> DistributeReport {
    let mut report = DistributeReport::default();

    let numbers = std::iter::successors(Some(request.initial_episode), |n| n.checked_add(1));
    for (number, links) in numbers.zip(split_chunks(&request.text)) {
        let Some(episode) = season.episodes.iter_mut().find(|e| e.number == number) else {
            warn!("No episode {} in season {}, chunk skipped", number, season.number);
            report.skipped.push(number);
            continue;
        };

        match request.mode {
            DistributionMode::Image => {
                episode.images.extend(links.iter().map(|l| (*l).to_string()));
            }
            DistributionMode::Video => {
                let existing = episode.videos.len();
                episode
                    .videos
                    .extend(links.iter().enumerate().map(|(idx, url)| VideoSource {
                        kind: request.link_type.source_label().to_string(),
                        label: format!("LECTEUR {}", existing + idx + 1),
                        url: (*url).to_string(),
                        langue: request.language.clone(),
                        quality: request.quality.clone(),
                    }));

                if !episode.langue.contains(&request.language) {
                    episode.langue.push(request.language.clone());
                }
            }
        }

        episode.last_updated = Some(now_ms);
        report.updated.push(number);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie::Episode;

    fn season(numbers: &[u32]) -> Season {
        Season {
            number: 1,
            episodes: numbers
                .iter()
                .map(|n| Episode {
                    id: n.to_string(),
                    number: *n,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn request(text: &str, mode: DistributionMode) -> DistributeRequest {
        DistributeRequest {
            season: 1,
            initial_episode: 1,
            text: text.to_string(),
            mode,
            link_type: LinkType::Online,
            language: "VOSTFR".to_string(),
            quality: "HD".to_string(),
        }
    }

    #[test]
    fn test_auto_distribute() {
        let text = "a\n b \n\nc\nd\ne";
        assert_eq!(auto_distribute(text, 2), "a\nb\n\nc\nd\n\ne");
        assert_eq!(auto_distribute("", 3), "");
        assert_eq!(auto_distribute("x\ny", 0), "x\n\ny");
    }

    #[test]
    fn test_split_chunks() {
        let chunks = split_chunks("a\nb\n  \n\nc\n\n\n");
        assert_eq!(chunks, vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn test_smart_group_manga() {
        let text = "https://cdn/x/10/01.jpg\nhttps://cdn/x/2/01.jpg\nhttps://cdn/x/10/02.jpg\nhttps://cdn/cover.jpg";
        assert_eq!(
            smart_group_manga(text).unwrap(),
            "https://cdn/x/2/01.jpg\n\nhttps://cdn/x/10/01.jpg\nhttps://cdn/x/10/02.jpg"
        );
        assert!(smart_group_manga("https://cdn/a/b.jpg").is_none());
    }

    #[test]
    fn test_distribute_videos_numbers_players() {
        let mut s = season(&[1, 2]);
        s.episodes[0].videos.push(VideoSource::default());
        s.episodes[0].langue.push("VF".to_string());

        let report = distribute(
            &mut s,
            &request("u1\nu2\n\nu3\n\nu4", DistributionMode::Video),
            42,
        );

        assert_eq!(report.updated, vec![1, 2]);
        assert_eq!(report.skipped, vec![3]);

        let first = &s.episodes[0];
        assert_eq!(first.videos.len(), 3);
        assert_eq!(first.videos[1].label, "LECTEUR 2");
        assert_eq!(first.videos[2].label, "LECTEUR 3");
        assert_eq!(first.videos[1].kind, "Embed link");
        assert_eq!(first.langue, vec!["VF", "VOSTFR"]);
        assert_eq!(first.last_updated, Some(42));

        assert_eq!(s.episodes[1].videos[0].label, "LECTEUR 1");
    }

    #[test]
    fn test_distribute_images_from_initial_episode() {
        let mut s = season(&[4, 5]);
        let mut req = request("p1\np2\n\np3", DistributionMode::Image);
        req.initial_episode = 4;

        let report = distribute(&mut s, &req, 1);
        assert_eq!(report.updated, vec![4, 5]);
        assert_eq!(s.episodes[0].images, vec!["p1", "p2"]);
        assert_eq!(s.episodes[1].images, vec!["p3"]);
        assert!(s.episodes[0].videos.is_empty());
    }

    #[test]
    fn test_distribute_stops_at_last_episode_number() {
        let mut s = season(&[u32::MAX]);
        let mut req = request("a\n\nb\n\nc", DistributionMode::Image);
        req.initial_episode = u32::MAX;

        let report = distribute(&mut s, &req, 1);
        assert_eq!(report.updated, vec![u32::MAX]);
        assert!(report.skipped.is_empty());
        assert_eq!(s.episodes[0].images, vec!["a"]);
    }
}
