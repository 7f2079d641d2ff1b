#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod models;
pub mod session;
pub mod ui;
pub mod utils;

// The engine
pub mod engine;

// Re-export commonly used types
pub use config::BreadthSettings;
pub use data::{SeriesCollection, fetch_breadth_data};
pub use domain::{Exchange, InstrumentId, VolumeBar};
pub use engine::{BreadthRatioEngine, EngineState, UpdateEvent, UpdateOutcome};
pub use error::BreadthError;
pub use session::{DemoSession, run_headless};
pub use ui::BreadthApp;

// CLI argument parsing
use clap::Parser;

use crate::config::BREADTH;
use crate::config::breadth::AlignmentPolicy;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Lookback window in calendar days (sign is ignored)
    #[arg(long, default_value_t = BREADTH.default_lookback_days, allow_negative_numbers = true)]
    pub lookback_days: i64,

    /// Track NASDAQ ($UVOLQ/$DVOLQ) next to NYSE
    #[arg(long, default_value_t = false)]
    pub nasdaq: bool,

    /// Skip the whole bar when NYSE has no data for it
    #[arg(long, default_value_t = false)]
    pub strict_primary: bool,

    /// Replay to stdout instead of opening the chart window
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Use generated sessions even when a cache or import file exists
    #[arg(long, default_value_t = false)]
    pub prefer_synthetic: bool,

    /// Bars replayed per viewer frame (overrides the saved setting)
    #[arg(long)]
    pub bars_per_frame: Option<usize>,
}

impl Cli {
    pub fn settings(&self) -> BreadthSettings {
        let mut settings = BreadthSettings::default().with_lookback_days(self.lookback_days);
        if self.nasdaq {
            settings = settings.with_nasdaq();
        }
        if self.strict_primary {
            settings = settings.with_alignment(AlignmentPolicy::PrimaryGated);
        }
        settings
    }
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(
    cc: &eframe::CreationContext,
    session: DemoSession,
    bars_per_frame: Option<usize>,
) -> Box<dyn eframe::App> {
    let app = ui::BreadthApp::new(cc, session, bars_per_frame);
    Box::new(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_track_nyse_over_twenty_days() {
        let cli = Cli::parse_from(["volume-breadth"]);
        let settings = cli.settings();
        assert_eq!(settings.effective_lookback_days(), 20);
        assert_eq!(settings.exchanges, vec![Exchange::Nyse]);
        assert_eq!(settings.alignment, AlignmentPolicy::Independent);
    }

    #[test]
    fn cli_accepts_negative_lookback() {
        let cli = Cli::parse_from([
            "volume-breadth",
            "--lookback-days",
            "-15",
            "--nasdaq",
            "--strict-primary",
        ]);
        let settings = cli.settings();
        assert_eq!(settings.effective_lookback_days(), 15);
        assert_eq!(settings.exchanges, vec![Exchange::Nyse, Exchange::Nasdaq]);
        assert_eq!(settings.alignment, AlignmentPolicy::PrimaryGated);
    }
}
