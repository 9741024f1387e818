//! K-pop chart aggregation library - shared by the CLI and tests.

pub mod artist;
pub mod cache;
pub mod chart;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod scoring;
pub mod table;
pub mod video;

pub use artist::ArtistIdentity;
pub use cache::SubstitutionCache;
pub use chart::{Chart, ChartFetcher, ChartSource, SnapshotFetcher};
pub use engine::{NormalizationEngine, NormalizedCharts};
pub use error::{ChartError, VideoLookupError};
pub use models::{Change, ChartEntry, ChartType, NormalizationStats, Rank};
pub use table::ChartTable;
