//! Core data models for chart aggregation.
//!
//! This module contains the chart-entry row, its enums, and the statistics
//! record produced by a normalization pass.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::artist::{group_label, ArtistIdentity};
use crate::cache::SubstitutionCache;

// ============================================================================
// Chart Types
// ============================================================================

/// Period/kind of chart requested from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Realtime,
    Week,
    AlbumWeek,
}

impl ChartType {
    /// Stable identifier used in snapshot file names and config.
    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Realtime => "realtime",
            ChartType::Week => "week",
            ChartType::AlbumWeek => "album_week",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Entry Models
// ============================================================================

/// Rank as reported by the source: a position or a source-native label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rank {
    Position(u32),
    Label(String),
}

impl Default for Rank {
    fn default() -> Self {
        Rank::Label(String::new())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Position(position) => write!(f, "{}", position),
            Rank::Label(label) => f.write_str(label),
        }
    }
}

/// Trend since the previous chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Change {
    Up,
    Down,
    #[default]
    #[serde(alias = "static", alias = "")]
    None,
    New,
}

/// One ranked row of a chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    #[serde(default)]
    pub rank: Rank,
    #[serde(default)]
    pub artists: Vec<ArtistIdentity>,
    #[serde(default)]
    pub title: String,
    /// Empty when unset.
    #[serde(default)]
    pub video: String,
    #[serde(default)]
    pub change: Change,
    #[serde(default)]
    pub change_diff: u32,
}

impl ChartEntry {
    pub fn new(rank: Rank, artists: Vec<ArtistIdentity>, title: impl Into<String>) -> Self {
        Self {
            rank,
            artists,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_video(mut self, video: impl Into<String>) -> Self {
        self.video = video.into();
        self
    }

    pub fn with_change(mut self, change: Change, change_diff: u32) -> Self {
        self.change = change;
        self.change_diff = change_diff;
        self
    }

    pub fn has_video(&self) -> bool {
        !self.video.is_empty()
    }

    /// Artist group label through the cache: "Crush, Zico".
    pub fn artist_label(&self, cache: &SubstitutionCache) -> String {
        group_label(&self.artists, cache)
    }

    /// "<artists> - <title>", used for display and video queries.
    pub fn display_name(&self, cache: &SubstitutionCache) -> String {
        format!("{} - {}", self.artist_label(cache), self.title)
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Counts collected during one normalization pass.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationStats {
    pub charts: usize,
    pub entries: usize,

    // Titles
    pub distinct_titles: usize,
    pub title_rewrites: usize,

    // Artists
    pub artist_list_replacements: usize,
    pub substitutions_recorded: usize,
    pub distinct_artist_groups: usize,
    pub artist_group_rewrites: usize,

    // Videos
    pub videos_propagated: usize,
}

impl NormalizationStats {
    /// Log stats at debug level in JSON format
    pub fn log_phase(&self, phase: &str) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            log::debug!("[STATS:{}]\n{}", phase, json);
        }
    }

    /// Write stats to a JSON file
    pub fn write_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_snapshot_json() {
        let json = r#"{
            "rank": 3,
            "artists": ["2NE1 (투애니원)", "BIGBANG"],
            "title": "Lonely",
            "change": "static",
            "change_diff": 0
        }"#;
        let entry: ChartEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.rank, Rank::Position(3));
        assert_eq!(entry.artists[0].extracted(), "2NE1");
        assert_eq!(entry.change, Change::None);
        assert!(!entry.has_video());
    }

    #[test]
    fn test_rank_label() {
        let entry: ChartEntry = serde_json::from_str(r#"{"rank": "HOT", "title": "x"}"#).unwrap();
        assert_eq!(entry.rank, Rank::Label("HOT".to_string()));
        assert_eq!(entry.rank.to_string(), "HOT");
    }

    #[test]
    fn test_change_values() {
        for (raw, expected) in [
            ("\"up\"", Change::Up),
            ("\"down\"", Change::Down),
            ("\"new\"", Change::New),
            ("\"none\"", Change::None),
            ("\"\"", Change::None),
        ] {
            assert_eq!(serde_json::from_str::<Change>(raw).unwrap(), expected);
        }
    }

    #[test]
    fn test_display_name() {
        let cache: SubstitutionCache = [("빅뱅", "BIGBANG")].into_iter().collect();
        let entry = ChartEntry::new(
            Rank::Position(1),
            vec![ArtistIdentity::new("빅뱅")],
            "Fantastic Baby",
        );
        assert_eq!(entry.display_name(&cache), "BIGBANG - Fantastic Baby");
    }

    #[test]
    fn test_chart_type_serde() {
        let parsed: ChartType = serde_json::from_str("\"album_week\"").unwrap();
        assert_eq!(parsed, ChartType::AlbumWeek);
        assert_eq!(ChartType::Week.to_string(), "week");
    }
}
