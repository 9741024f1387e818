use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use kpop_charts::config::ChartsConfig;
use kpop_charts::progress::{self, chart_loaded, chart_progress, format_duration, phase_spinner};
use kpop_charts::{
    ChartTable, NormalizationEngine, NormalizedCharts, SnapshotFetcher, SubstitutionCache,
};

#[derive(Parser)]
#[command(name = "kpop-charts")]
#[command(about = "Merge Korean music charts into one normalized Markdown table")]
struct Args {
    /// Run configuration (TOML); defaults apply when missing
    #[arg(long, default_value = "charts.toml")]
    config: PathBuf,

    /// Directory holding <source>-<chart_type>.json snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Number of charts rendered as table columns
    #[arg(long)]
    columns: Option<usize>,

    /// Number of ranks rendered
    #[arg(long)]
    limit: Option<usize>,

    /// Write normalization stats as JSON
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Append the chart URLs below the table
    #[arg(long)]
    show_urls: bool,

    /// Hide progress bars and log each step instead
    #[arg(long)]
    log_only: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Info);
    clog.parse_default_env();
    clog.init();

    progress::set_log_only(args.log_only);

    let start = Instant::now();

    let mut config = ChartsConfig::load(&args.config)?;
    if let Some(dir) = args.snapshot_dir {
        config.snapshot_dir = dir;
    }
    if let Some(columns) = args.columns {
        config.table.columns = Some(columns);
    }
    if let Some(limit) = args.limit {
        config.table.limit = limit;
    }

    let fetcher = SnapshotFetcher::new(&config.snapshot_dir);
    log::info!("Reading snapshots from {}", fetcher.dir().display());

    let pb = chart_progress(config.charts.len());
    let mut charts = Vec::with_capacity(config.charts.len());
    for spec in &config.charts {
        match spec.build(&fetcher) {
            Ok(chart) => {
                chart_loaded(&pb, chart.name(), chart.len());
                charts.push(chart);
            }
            Err(err) => {
                log::error!("Skipping {} chart: {:#}", err.source_name(), anyhow::Error::from(err));
                pb.inc(1);
            }
        }
    }
    pb.finish_and_clear();

    if charts.is_empty() {
        bail!("No charts could be loaded");
    }

    let spinner = phase_spinner("Normalizing");
    let engine = NormalizationEngine::with_threshold(config.similarity_threshold);
    let normalized = NormalizedCharts::with_engine(engine, charts, SubstitutionCache::new());
    spinner.finish_and_clear();

    if let Some(path) = &args.stats {
        normalized
            .stats()
            .write_to_file(path)
            .with_context(|| format!("Failed to write stats to {}", path.display()))?;
        log::info!("Stats written to {}", path.display());
    }

    let mut table = ChartTable::new(normalized.charts(), normalized.cache())
        .with_limit(config.table.limit);
    if let Some(columns) = config.table.columns {
        table = table.with_columns(columns);
    }
    if let Some(header) = &config.table.header {
        table = table.with_header(header.clone());
    }

    println!("{}", table);

    if args.show_urls {
        println!("\nURLs used:");
        for chart in &normalized {
            println!("{}", chart.url());
        }
    }

    log::info!(
        "Done: {} charts, {} substitutions in {}",
        normalized.len(),
        normalized.cache().len(),
        format_duration(start.elapsed())
    );

    Ok(())
}
