//! Error types for chart building and video lookup.
//!
//! Normalization itself has no error type: it is a pure transformation over
//! already-fetched charts.

use thiserror::Error;

use crate::models::ChartType;

/// Errors raised while building or populating a chart.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Requested chart type is not offered by the source; raised before fetching.
    #[error("Chart {source_name} does not support the {chart_type} chart type")]
    Build {
        source_name: &'static str,
        chart_type: ChartType,
    },

    /// Network or parse failure while populating the chart.
    #[error("Error fetching {source_name} chart: {cause}")]
    Fetch {
        source_name: &'static str,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ChartError {
    /// Display name of the source that failed.
    pub fn source_name(&self) -> &'static str {
        match self {
            ChartError::Build { source_name, .. } | ChartError::Fetch { source_name, .. } => {
                source_name
            }
        }
    }
}

/// Errors raised by an external video search.
#[derive(Error, Debug)]
pub enum VideoLookupError {
    /// No credentials configured for the search service
    #[error("No API key set")]
    MissingApiKey,

    /// Search service failure
    #[error("Video search failed: {0}")]
    Search(String),
}

/// Convenience Result type for chart building
pub type Result<T> = std::result::Result<T, ChartError>;
