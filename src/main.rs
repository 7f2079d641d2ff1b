#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use anyhow::{Result, anyhow};
use clap::Parser;
use eframe::NativeOptions;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use volume_breadth::config::{DEMO, PERSISTENCE};
use volume_breadth::data::spawn_cache_write;
use volume_breadth::data::timeseries::cache_file::CacheFile;
use volume_breadth::{Cli, DemoSession, fetch_breadth_data, run_app, run_headless};

fn main() -> Result<()> {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);
    let settings = args.settings();

    // C. Data Loading (Blocking)
    let rt = Runtime::new()?;
    let (collection, signature) = rt.block_on(fetch_breadth_data(&args))?;
    log::info!("Loaded {} series via {}", collection.series.len(), signature);

    // D. Imported JSON gets a binary cache for the next start
    let cache_write = (signature == "JSON Import").then(|| {
        spawn_cache_write(
            rt.handle(),
            collection.clone(),
            settings.interval_ms,
            CacheFile::default_cache_path(settings.interval_ms),
        )
    });

    let mut session = DemoSession::new(collection, signature, settings)?;

    if args.headless {
        run_headless(&mut session)?;
        join_cache_write(&rt, cache_write);
        return Ok(());
    }

    // E. Run Native App
    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(PERSISTENCE.app_state_path)),
        ..Default::default()
    };

    let bars_per_frame = args.bars_per_frame;
    let viewer = eframe::run_native(
        DEMO.window_title,
        options,
        Box::new(move |cc| Ok(run_app(cc, session, bars_per_frame))),
    );
    join_cache_write(&rt, cache_write);
    viewer.map_err(|e| anyhow!("Viewer failed: {}", e))
}

fn join_cache_write(rt: &Runtime, cache_write: Option<JoinHandle<()>>) {
    if let Some(handle) = cache_write {
        if let Err(e) = rt.block_on(handle) {
            log::error!("Cache write task failed: {}", e);
        }
    }
}
