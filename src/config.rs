//! Run configuration loaded from TOML.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::chart::{Chart, ChartFetcher, ChartSource, DEFAULT_CHART_LIMIT};
use crate::models::ChartType;
use crate::scoring::SIMILARITY_THRESHOLD;
use crate::table::DEFAULT_TABLE_LIMIT;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChartsConfig {
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    /// In order; the first chart is the video authority.
    #[serde(default = "default_charts")]
    pub charts: Vec<ChartSpec>,
    #[serde(default)]
    pub table: TableConfig,
    /// Ratio above which two titles or artist groups are the same.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChartSpec {
    pub source: ChartSource,
    pub chart_type: Option<ChartType>,
    #[serde(default = "default_chart_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TableConfig {
    pub columns: Option<usize>,
    #[serde(default = "default_table_limit")]
    pub limit: usize,
    pub header: Option<String>,
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("snapshots")
}

fn default_charts() -> Vec<ChartSpec> {
    [ChartSource::IChart, ChartSource::Melon, ChartSource::Gaon]
        .into_iter()
        .map(ChartSpec::new)
        .collect()
}

fn default_similarity_threshold() -> f64 {
    SIMILARITY_THRESHOLD
}

fn default_chart_limit() -> usize {
    DEFAULT_CHART_LIMIT
}

fn default_table_limit() -> usize {
    DEFAULT_TABLE_LIMIT
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            charts: default_charts(),
            table: TableConfig::default(),
            similarity_threshold: SIMILARITY_THRESHOLD,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            columns: None,
            limit: DEFAULT_TABLE_LIMIT,
            header: None,
        }
    }
}

impl ChartSpec {
    /// Source default chart type, default limit.
    pub fn new(source: ChartSource) -> Self {
        Self {
            source,
            chart_type: None,
            limit: DEFAULT_CHART_LIMIT,
        }
    }

    pub fn build(&self, fetcher: &dyn ChartFetcher) -> crate::error::Result<Chart> {
        Chart::fetch(self.source, self.chart_type, self.limit, fetcher)
    }
}

impl ChartsConfig {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config file as TOML")
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChartsConfig::from_toml("").unwrap();
        assert_eq!(config, ChartsConfig::default());
        assert_eq!(config.charts.len(), 3);
        assert_eq!(config.charts[0].source, ChartSource::IChart);
        assert_eq!(config.charts[0].limit, 50);
        assert_eq!(config.table.limit, 20);
        assert!(config.table.columns.is_none());
        assert_eq!(config.similarity_threshold, 0.8);
    }

    #[test]
    fn test_parse_full_config() {
        let config = ChartsConfig::from_toml(
            r#"
            snapshot_dir = "data"
            similarity_threshold = 0.9

            [[charts]]
            source = "ichart"
            chart_type = "week"

            [[charts]]
            source = "gaon"
            chart_type = "album_week"
            limit = 10

            [table]
            columns = 1
            limit = 10
            header = " | Realtime iChart"
            "#,
        )
        .unwrap();

        assert_eq!(config.snapshot_dir, PathBuf::from("data"));
        assert_eq!(config.similarity_threshold, 0.9);
        assert_eq!(config.charts.len(), 2);
        assert_eq!(config.charts[0].chart_type, Some(ChartType::Week));
        assert_eq!(config.charts[0].limit, 50);
        assert_eq!(config.charts[1].chart_type, Some(ChartType::AlbumWeek));
        assert_eq!(config.charts[1].limit, 10);
        assert_eq!(config.table.columns, Some(1));
        assert_eq!(config.table.header.as_deref(), Some(" | Realtime iChart"));
    }

    #[test]
    fn test_unknown_source_rejected() {
        let err = ChartsConfig::from_toml("[[charts]]\nsource = \"billboard\"\n").unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }

    #[test]
    fn test_load_missing_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts.toml");

        assert_eq!(ChartsConfig::load(&path).unwrap(), ChartsConfig::default());

        std::fs::write(&path, "[[charts]]\nsource = \"melon\"\n").unwrap();
        let config = ChartsConfig::load(&path).unwrap();
        assert_eq!(config.charts, vec![ChartSpec::new(ChartSource::Melon)]);
    }
}
