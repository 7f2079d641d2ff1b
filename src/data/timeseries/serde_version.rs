#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::PERSISTENCE;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::data::timeseries::{CreateSeriesCollection, SeriesCollection, cache_file::CacheFile};

/// Load a cache and reject it when its version or bar period does not match.
pub fn load_valid_cache(path: &Path, version_required: f64, interval_ms: i64) -> Result<CacheFile> {
    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_serde {
        log::info!("Checking validity of local cache at {:?}...", path);
    }
    let cache = CacheFile::load_from_path(path)?;

    if cache.version != version_required {
        bail!(
            "Cache version mismatch: file v{} vs required v{}",
            cache.version,
            version_required
        );
    }

    if cache.interval_ms != interval_ms {
        bail!(
            "Cache interval mismatch: file has {}ms intervals, expected {}ms",
            cache.interval_ms,
            interval_ms
        );
    }

    if let Some(stray) = cache
        .data
        .series
        .iter()
        .find(|s| s.interval_ms != interval_ms)
    {
        bail!(
            "Series {} stored at {}ms, cache claims {}ms",
            stray.instrument,
            stray.interval_ms,
            interval_ms
        );
    }

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_serde {
        log::info!(
            "Cache valid: v{}, interval {}ms, {} series",
            cache.version,
            cache.interval_ms,
            cache.data.series.len()
        );
    }

    Ok(cache)
}

/// Write a series collection to the binary cache file.
pub fn write_collection_locally(
    collection: &SeriesCollection,
    interval_ms: i64,
    path: &Path,
) -> Result<()> {
    #[cfg(debug_assertions)]
    let start_time = DEBUG_FLAGS.print_serde.then(|| {
        log::info!("Writing cache to disk: {:?}...", path);
        std::time::Instant::now()
    });

    let cache = CacheFile::new(interval_ms, collection.clone(), PERSISTENCE.series_version);
    cache.save_to_path(path)?;

    #[cfg(debug_assertions)]
    if let Some(start) = start_time {
        let file_size = std::fs::metadata(path)?.len();
        log::info!(
            "Cache written: {:?} ({:.1} KB in {:.2}s)",
            path,
            file_size as f64 / 1024.0,
            start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Async wrapper for write_collection_locally
/// Spawns blocking task to avoid freezing UI
pub async fn write_collection_async(
    collection: SeriesCollection,
    interval_ms: i64,
    path: PathBuf,
) -> Result<()> {
    tokio::task::spawn_blocking(move || write_collection_locally(&collection, interval_ms, &path))
        .await
        .context("Cache write task panicked")?
}

/// Write the cache in the background on `runtime`. Await the handle before
/// dropping the runtime, otherwise the write can be cancelled.
pub fn spawn_cache_write(
    runtime: &tokio::runtime::Handle,
    collection: SeriesCollection,
    interval_ms: i64,
    path: PathBuf,
) -> tokio::task::JoinHandle<()> {
    runtime.spawn(async move {
        if let Err(e) = write_collection_async(collection, interval_ms, path).await {
            log::error!("Failed to write cache: {:#}", e);
        }
    })
}

/// Reads the bincode cache written by `make_demo_cache`.
pub struct SerdeVersion {
    pub interval_ms: i64,
    pub path: PathBuf,
}

impl SerdeVersion {
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms,
            path: CacheFile::default_cache_path(interval_ms),
        }
    }
}

#[async_trait]
impl CreateSeriesCollection for SerdeVersion {
    fn signature(&self) -> &'static str {
        "Local Cache"
    }

    async fn create_collection(&self) -> Result<SeriesCollection> {
        let path = self.path.clone();
        let interval_ms = self.interval_ms;

        #[cfg(debug_assertions)]
        let start_time = DEBUG_FLAGS.print_serde.then(|| {
            log::info!("Reading cache from: {:?}...", path);
            std::time::Instant::now()
        });

        let cache = tokio::task::spawn_blocking(move || {
            load_valid_cache(&path, PERSISTENCE.series_version, interval_ms)
        })
        .await
        .context("Deserialization task panicked")?
        .context("Failed to load cache file")?;

        #[cfg(debug_assertions)]
        if let Some(start) = start_time {
            log::info!(
                "Cache loaded: {} series in {:.2}s",
                cache.data.series.len(),
                start.elapsed().as_secs_f64()
            );
        }

        Ok(cache.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::timeseries::StoredSeries;
    use crate::domain::{InstrumentId, VolumeBar};
    use crate::utils::TimeUtils;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("volume_breadth_serde_{}_{}", name, std::process::id()))
            .join("breadth.bin")
    }

    fn collection(interval_ms: i64) -> SeriesCollection {
        SeriesCollection {
            name: "cache test".to_string(),
            version: PERSISTENCE.series_version,
            series: vec![StoredSeries {
                instrument: InstrumentId::new("$DVOL", "dxFeed"),
                interval_ms,
                bars: vec![VolumeBar::new(0, 5.0)],
            }],
        }
    }

    #[test]
    fn written_cache_loads_through_the_chain() {
        let path = scratch("roundtrip");
        let data = collection(TimeUtils::MS_IN_15_MIN);
        write_collection_locally(&data, TimeUtils::MS_IN_15_MIN, &path).unwrap();

        let loader = SerdeVersion {
            interval_ms: TimeUtils::MS_IN_15_MIN,
            path: path.clone(),
        };
        let rt = tokio::runtime::Runtime::new().unwrap();
        let loaded = rt.block_on(loader.create_collection()).unwrap();
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        assert_eq!(loaded, data);
    }

    #[test]
    fn background_write_finishes_when_joined() {
        let path = scratch("background");
        let data = collection(TimeUtils::MS_IN_15_MIN);

        let rt = tokio::runtime::Runtime::new().unwrap();
        let handle = spawn_cache_write(
            rt.handle(),
            data.clone(),
            TimeUtils::MS_IN_15_MIN,
            path.clone(),
        );
        rt.block_on(handle).unwrap();
        drop(rt);

        let cache =
            load_valid_cache(&path, PERSISTENCE.series_version, TimeUtils::MS_IN_15_MIN).unwrap();
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        assert_eq!(cache.data, data);
    }

    #[test]
    fn interval_mismatch_is_rejected() {
        let path = scratch("interval");
        let data = collection(TimeUtils::MS_IN_15_MIN);
        write_collection_locally(&data, TimeUtils::MS_IN_15_MIN, &path).unwrap();

        let result = load_valid_cache(&path, PERSISTENCE.series_version, TimeUtils::MS_IN_H);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        assert!(result.is_err());
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let path = scratch("version");
        let data = collection(TimeUtils::MS_IN_15_MIN);
        write_collection_locally(&data, TimeUtils::MS_IN_15_MIN, &path).unwrap();

        let result = load_valid_cache(&path, 99.0, TimeUtils::MS_IN_15_MIN);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        assert!(result.is_err());
    }

    #[test]
    fn stray_series_interval_is_rejected() {
        let path = scratch("stray");
        let data = collection(TimeUtils::MS_IN_H);
        write_collection_locally(&data, TimeUtils::MS_IN_15_MIN, &path).unwrap();

        let result =
            load_valid_cache(&path, PERSISTENCE.series_version, TimeUtils::MS_IN_15_MIN);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        assert!(result.is_err());
    }
}
