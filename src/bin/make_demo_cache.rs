use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use volume_breadth::config::BREADTH;
use volume_breadth::data::timeseries::cache_file::CacheFile;
use volume_breadth::data::timeseries::get_collection_async;
use volume_breadth::data::timeseries::synthetic_version::SyntheticVersion;
use volume_breadth::data::timeseries::CreateSeriesCollection;
use volume_breadth::data::write_collection_async;
use volume_breadth::utils::time_utils::utc_now_as_timestamp_ms;

/// Write generated sessions to the binary cache the viewer loads first.
#[derive(Parser, Debug)]
struct Args {
    /// Calendar days of sessions to generate
    #[arg(long, default_value_t = BREADTH.default_lookback_days as u64 + 1)]
    days: u64,

    /// Output file (defaults to the viewer's cache path)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    let args = Args::parse();

    let interval_ms = BREADTH.interval_ms;
    let path = args
        .output
        .unwrap_or_else(|| CacheFile::default_cache_path(interval_ms));

    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let chain: Vec<Box<dyn CreateSeriesCollection>> = vec![Box::new(SyntheticVersion {
        end_ms: utc_now_as_timestamp_ms(),
        days: args.days,
        interval_ms,
    })];

    let (collection, signature) = rt.block_on(get_collection_async(&chain))?;
    let bar_total: usize = collection.series.iter().map(|s| s.bars.len()).sum();
    rt.block_on(write_collection_async(collection, interval_ms, path.clone()))
        .with_context(|| format!("Failed to write {:?}", path))?;

    println!(
        "Demo cache written to {:?}: {} bars from {} over {} days.",
        path, bar_total, signature, args.days
    );
    Ok(())
}
