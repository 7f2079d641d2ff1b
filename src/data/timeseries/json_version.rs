use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use crate::config::PERSISTENCE;
use crate::data::timeseries::{CreateSeriesCollection, SeriesCollection};

/// Reads a hand-written collection exported as JSON.
///
/// The file is a serialized [`SeriesCollection`]; each entry of `series` looks like
/// `{"instrument": {"symbol": "$UVOL", "connection": "dxFeed"}, "interval_ms": 900000,
/// "bars": [{"timestamp_ms": .., "close": ..}]}`
pub struct JsonVersion {
    pub interval_ms: i64,
    pub path: PathBuf,
}

impl JsonVersion {
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms,
            path: PathBuf::from(PERSISTENCE.series_directory)
                .join(PERSISTENCE.json_import_filename),
        }
    }
}

#[async_trait]
impl CreateSeriesCollection for JsonVersion {
    fn signature(&self) -> &'static str {
        "JSON Import"
    }

    async fn create_collection(&self) -> Result<SeriesCollection> {
        let path = self.path.clone();
        let collection = tokio::task::spawn_blocking(move || read_collection(&path))
            .await
            .context("JSON import task panicked")??;

        if collection.series.is_empty() {
            bail!("JSON import holds no series");
        }
        if let Some(stray) = collection
            .series
            .iter()
            .find(|s| s.interval_ms != self.interval_ms)
        {
            bail!(
                "{} is sampled at {}ms, expected {}ms",
                stray.instrument,
                stray.interval_ms,
                self.interval_ms
            );
        }

        Ok(collection)
    }
}

fn read_collection(path: &Path) -> Result<SeriesCollection> {
    let file = File::open(path).context(format!("Failed to open {:?}", path))?;
    serde_json::from_reader(BufReader::new(file)).context(format!("Failed to parse {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_import(name: &str, body: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "volume_breadth_json_{}_{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("import.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    const IMPORT: &str = r#"{
        "name": "hand written",
        "version": 1.0,
        "series": [
            {
                "instrument": { "symbol": "$UVOL", "connection": "dxFeed" },
                "interval_ms": 900000,
                "bars": [ { "timestamp_ms": 0, "close": 300.0 } ]
            },
            {
                "instrument": { "symbol": "$DVOL", "connection": "dxFeed" },
                "interval_ms": 900000,
                "bars": [ { "timestamp_ms": 0, "close": 100.0 } ]
            }
        ]
    }"#;

    #[test]
    fn imports_a_hand_written_collection() {
        let path = write_import("ok", IMPORT);
        let loader = JsonVersion {
            interval_ms: 900_000,
            path: path.clone(),
        };

        let rt = tokio::runtime::Runtime::new().unwrap();
        let data = rt.block_on(loader.create_collection()).unwrap();
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        assert_eq!(data.name, "hand written");
        assert_eq!(data.find("$DVOL", "dxFeed").unwrap().bars[0].close, 100.0);
    }

    #[test]
    fn rejects_a_different_bar_period() {
        let path = write_import("period", IMPORT);
        let loader = JsonVersion {
            interval_ms: 60_000,
            path: path.clone(),
        };

        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(loader.create_collection());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        assert!(result.is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let path = write_import("broken", "{ \"name\": ");
        let loader = JsonVersion {
            interval_ms: 900_000,
            path: path.clone(),
        };

        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(loader.create_collection());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        assert!(result.is_err());
    }
}
