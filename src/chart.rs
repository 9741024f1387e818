//! Chart sources and size-limited charts.
//!
//! Scraping is an external concern: a [`ChartFetcher`] hands back parsed
//! rows, and [`Chart`] enforces the source's supported chart types and the
//! configured row limit.

use anyhow::Context;
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::artist::ArtistIdentity;
use crate::error::{ChartError, Result};
use crate::models::{Change, ChartEntry, ChartType, Rank};
use crate::normalize::{fix_encoding, split_artist_credits, trim_unbalanced_parenthesis};

/// Rows kept per chart unless configured otherwise.
pub const DEFAULT_CHART_LIMIT: usize = 50;

// ============================================================================
// Sources
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSource {
    #[serde(alias = "i_chart")]
    IChart,
    Melon,
    Gaon,
}

impl ChartSource {
    /// Identifier used in config and snapshot file names.
    pub fn id(self) -> &'static str {
        match self {
            ChartSource::IChart => "ichart",
            ChartSource::Melon => "melon",
            ChartSource::Gaon => "gaon",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChartSource::IChart => "iChart",
            ChartSource::Melon => "Melon",
            ChartSource::Gaon => "Gaon",
        }
    }

    pub fn supported_chart_types(self) -> &'static [ChartType] {
        match self {
            ChartSource::IChart | ChartSource::Melon => &[ChartType::Realtime, ChartType::Week],
            ChartSource::Gaon => &[ChartType::Week, ChartType::AlbumWeek],
        }
    }

    pub fn default_chart_type(self) -> ChartType {
        match self {
            ChartSource::IChart | ChartSource::Melon => ChartType::Realtime,
            ChartSource::Gaon => ChartType::Week,
        }
    }

    pub fn supports(self, chart_type: ChartType) -> bool {
        self.supported_chart_types().contains(&chart_type)
    }

    /// Referer header the source insists on, if any.
    pub fn referer(self) -> Option<&'static str> {
        match self {
            ChartSource::IChart => Some("http://ichart.instiz.net/"),
            _ => None,
        }
    }

    /// Page URL for a chart type, with weekly charts pointing at the week
    /// before `today`. `None` for unsupported types.
    pub fn url(self, chart_type: ChartType, today: NaiveDate) -> Option<String> {
        let (year, week) = previous_week(today);

        let url = match (self, chart_type) {
            (ChartSource::IChart, ChartType::Realtime) => {
                "http://www.instiz.net/iframe_ichart_score.htm".to_string()
            }
            (ChartSource::IChart, ChartType::Week) => format!(
                "http://www.instiz.net/iframe_ichart_score.htm?week=1&selyear={}&sel={}",
                year, week
            ),
            (ChartSource::Melon, ChartType::Realtime) => {
                "http://www.melon.com/chart/index.htm".to_string()
            }
            (ChartSource::Melon, ChartType::Week) => {
                "http://www.melon.com/chart/week/index.htm".to_string()
            }
            (ChartSource::Gaon, ChartType::Week) => format!(
                "http://gaonchart.co.kr/main/section/chart/online.gaon?serviceGbn=ALL&termGbn=week&hitYear={}&targetTime=&nationGbn=K",
                year
            ),
            (ChartSource::Gaon, ChartType::AlbumWeek) => format!(
                "http://gaonchart.co.kr/main/section/chart/album.gaon?termGbn=week&hitYear={}&nationGbn=T",
                year
            ),
            _ => return None,
        };

        Some(url)
    }
}

impl fmt::Display for ChartSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ISO (year, week) of the week before `today`.
pub fn previous_week(today: NaiveDate) -> (i32, u32) {
    let week = (today - Duration::days(7)).iso_week();
    (week.year(), week.week())
}

// ============================================================================
// Fetching
// ============================================================================

/// What a fetcher needs to know to produce rows for one chart.
#[derive(Debug, Clone)]
pub struct FetchRequest<'a> {
    pub source: ChartSource,
    pub chart_type: ChartType,
    pub url: &'a str,
    pub referer: Option<&'static str>,
    pub limit: usize,
}

/// Produces parsed rows for a chart (network scraper, snapshot reader, ...).
pub trait ChartFetcher {
    fn fetch(&self, request: &FetchRequest<'_>) -> anyhow::Result<Vec<ChartEntry>>;
}

/// Row as a scraper emits it: one raw credit line instead of split artists.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScrapedRow {
    #[serde(default)]
    pub rank: Option<Rank>,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub video: String,
    #[serde(default)]
    pub change: Change,
    #[serde(default)]
    pub change_diff: u32,
}

impl ScrapedRow {
    /// Turn a raw row into an entry, applying the source's text conventions.
    /// Rows without a rank get `position`.
    pub fn into_entry(self, source: ChartSource, position: u32) -> ChartEntry {
        let title = match source {
            ChartSource::IChart => trim_unbalanced_parenthesis(&self.title),
            _ => self.title.trim().to_string(),
        };

        let artists = split_artist_credits(&self.artist)
            .iter()
            .map(|name| ArtistIdentity::new(name))
            .collect();

        ChartEntry {
            rank: self.rank.unwrap_or(Rank::Position(position)),
            artists,
            title: fix_encoding(&title),
            video: self.video,
            change: self.change,
            change_diff: self.change_diff,
        }
    }
}

/// Reads pre-scraped rows from `<dir>/<source>-<chart_type>.json`.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    dir: PathBuf,
}

impl SnapshotFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn snapshot_path(&self, source: ChartSource, chart_type: ChartType) -> PathBuf {
        self.dir
            .join(format!("{}-{}.json", source.id(), chart_type.as_str()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChartFetcher for SnapshotFetcher {
    fn fetch(&self, request: &FetchRequest<'_>) -> anyhow::Result<Vec<ChartEntry>> {
        let path = self.snapshot_path(request.source, request.chart_type);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

        let rows = values.into_iter().enumerate().filter_map(|(i, value)| {
            match serde_json::from_value::<ScrapedRow>(value) {
                Ok(row) => Some(row),
                Err(err) => {
                    log::warn!("[{}] skipping snapshot row {}: {}", request.source, i + 1, err);
                    None
                }
            }
        });

        Ok(rows
            .take(request.limit)
            .enumerate()
            .map(|(i, row)| row.into_entry(request.source, i as u32 + 1))
            .collect())
    }
}

// ============================================================================
// Chart
// ============================================================================

/// One source's ranked list for a chart type, capped at `limit` rows.
#[derive(Debug, Clone)]
pub struct Chart {
    source: ChartSource,
    chart_type: ChartType,
    limit: usize,
    url: String,
    entries: Vec<ChartEntry>,
}

impl Chart {
    /// Empty chart; `chart_type` defaults to the source's default.
    pub fn new(source: ChartSource, chart_type: Option<ChartType>, limit: usize) -> Result<Self> {
        Self::new_for_date(source, chart_type, limit, Local::now().date_naive())
    }

    pub fn new_for_date(
        source: ChartSource,
        chart_type: Option<ChartType>,
        limit: usize,
        today: NaiveDate,
    ) -> Result<Self> {
        let chart_type = chart_type.unwrap_or_else(|| source.default_chart_type());
        let unsupported = ChartError::Build {
            source_name: source.name(),
            chart_type,
        };

        if !source.supports(chart_type) {
            return Err(unsupported);
        }
        let url = source.url(chart_type, today).ok_or(unsupported)?;

        Ok(Self {
            source,
            chart_type,
            limit,
            url,
            entries: Vec::new(),
        })
    }

    /// Build a chart and populate it through `fetcher`.
    pub fn fetch(
        source: ChartSource,
        chart_type: Option<ChartType>,
        limit: usize,
        fetcher: &dyn ChartFetcher,
    ) -> Result<Self> {
        let mut chart = Self::new(source, chart_type, limit)?;
        chart.populate(fetcher)?;
        Ok(chart)
    }

    /// Build a chart from rows already in hand; rows past the limit are dropped.
    pub fn from_entries(
        source: ChartSource,
        chart_type: Option<ChartType>,
        limit: usize,
        entries: Vec<ChartEntry>,
    ) -> Result<Self> {
        let mut chart = Self::new(source, chart_type, limit)?;
        chart.extend(entries);
        Ok(chart)
    }

    /// Replace the chart's rows with what `fetcher` returns.
    pub fn populate(&mut self, fetcher: &dyn ChartFetcher) -> Result<()> {
        let request = FetchRequest {
            source: self.source,
            chart_type: self.chart_type,
            url: &self.url,
            referer: self.source.referer(),
            limit: self.limit,
        };

        let entries = fetcher.fetch(&request).map_err(|err| ChartError::Fetch {
            source_name: self.source.name(),
            cause: err.into(),
        })?;

        self.entries.clear();
        self.extend(entries);
        log::info!(
            "[{}] {} chart: {} entries",
            self.source.name(),
            self.chart_type,
            self.entries.len()
        );
        Ok(())
    }

    /// Append a row; returns false (and drops it) once the chart is full.
    pub fn push(&mut self, entry: ChartEntry) -> bool {
        if self.entries.len() >= self.limit {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = ChartEntry>) {
        for entry in entries {
            if !self.push(entry) {
                break;
            }
        }
    }

    pub fn name(&self) -> &'static str {
        self.source.name()
    }

    pub fn source(&self) -> ChartSource {
        self.source
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [ChartEntry] {
        &mut self.entries
    }

    /// Row at a 0-based index.
    pub fn get(&self, index: usize) -> Option<&ChartEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
