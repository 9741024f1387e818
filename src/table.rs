//! Markdown table over normalized charts, one chart per column.

use std::fmt;

use crate::cache::SubstitutionCache;
use crate::chart::Chart;
use crate::models::{Change, ChartEntry};

/// Ranks shown unless configured otherwise.
pub const DEFAULT_TABLE_LIMIT: usize = 20;

pub struct ChartTable<'a> {
    charts: &'a [Chart],
    cache: &'a SubstitutionCache,
    columns: usize,
    limit: usize,
    header: Option<String>,
}

impl<'a> ChartTable<'a> {
    /// Table over every chart, top [`DEFAULT_TABLE_LIMIT`] ranks.
    pub fn new(charts: &'a [Chart], cache: &'a SubstitutionCache) -> Self {
        Self {
            charts,
            cache,
            columns: charts.len(),
            limit: DEFAULT_TABLE_LIMIT,
            header: None,
        }
    }

    /// Only render the first `columns` charts.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.min(self.charts.len());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Replace the generated header line.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn shown(&self) -> &'a [Chart] {
        &self.charts[..self.columns]
    }

    fn header_line(&self) -> String {
        if let Some(header) = &self.header {
            return header.clone();
        }

        std::iter::once(String::new())
            .chain(
                self.shown()
                    .iter()
                    .map(|chart| format!("*{} Top {}*", chart.name(), self.limit)),
            )
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn cell(&self, entry: Option<&ChartEntry>) -> String {
        match entry {
            Some(entry) => format!(
                "{} {}",
                make_link(&entry.video, &entry.display_name(self.cache)),
                make_change(entry.change, entry.change_diff)
            ),
            None => String::new(),
        }
    }
}

impl fmt::Display for ChartTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header_line())?;

        let mut alignment = vec!["---"; self.columns + 1];
        alignment[0] = "---:";
        write!(f, "{}", alignment.join("|"))?;

        for i in 0..self.limit {
            let cells: Vec<String> = self
                .shown()
                .iter()
                .map(|chart| self.cell(chart.get(i)))
                .collect();
            write!(f, "\n{}. | {}", i + 1, cells.join(" | "))?;
        }

        Ok(())
    }
}

/// Markdown link when a video is known, otherwise the bare text.
pub fn make_link(url: &str, text: &str) -> String {
    let text = text.replace('`', "'");

    if url.is_empty() {
        text
    } else {
        format!("[{}]({})", text, url)
    }
}

/// Superscript trend marker.
pub fn make_change(change: Change, diff: u32) -> String {
    if diff == 0 {
        return "–".to_string();
    }

    match change {
        Change::New => "^NEW".to_string(),
        Change::Up => format!("^↑{}", diff),
        Change::Down => format!("^↓{}", diff),
        Change::None => "–".to_string(),
    }
}
