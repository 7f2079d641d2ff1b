// Async code to run in main before egui starts up

use anyhow::Result;

use crate::Cli;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::timeseries::json_version::JsonVersion;
use crate::data::timeseries::serde_version::SerdeVersion;
use crate::data::timeseries::synthetic_version::SyntheticVersion;
use crate::data::timeseries::{CreateSeriesCollection, SeriesCollection, get_collection_async};
use crate::utils::time_utils::utc_now_as_timestamp_ms;

/// Sources tried in order. The synthetic generator never fails, so it closes every chain.
pub fn loader_chain(args: &Cli) -> Vec<Box<dyn CreateSeriesCollection>> {
    let settings = args.settings();
    let synthetic = SyntheticVersion {
        end_ms: utc_now_as_timestamp_ms(),
        days: settings.effective_lookback_days(),
        interval_ms: settings.interval_ms,
    };

    if args.prefer_synthetic {
        vec![Box::new(synthetic)]
    } else {
        vec![
            Box::new(SerdeVersion::new(settings.interval_ms)),
            Box::new(JsonVersion::new(settings.interval_ms)),
            Box::new(synthetic),
        ]
    }
}

// The async function to run before the GUI starts at all (so can't rely on gui app state)
pub async fn fetch_breadth_data(args: &Cli) -> Result<(SeriesCollection, &'static str)> {
    let providers = loader_chain(args);
    let (data, signature) = get_collection_async(&providers).await?;

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_serde {
        log::info!(
            "Retrieved {} series ({}) using: {}.",
            data.series.len(),
            data.unique_symbols().join(", "),
            signature
        );
    }

    Ok((data, signature))
}
