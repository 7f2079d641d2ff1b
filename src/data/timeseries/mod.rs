pub mod cache_file;
pub mod json_version;
pub mod serde_version;
pub mod synthetic_version;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{InstrumentId, VolumeBar};

#[async_trait]
pub trait CreateSeriesCollection {
    // Either create a series collection OR return an anyhow::error
    async fn create_collection(&self) -> Result<SeriesCollection>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

pub async fn get_collection_async(
    implementations: &[Box<dyn CreateSeriesCollection>],
) -> Result<(SeriesCollection, &'static str)> {
    for imp in implementations {
        match imp.create_collection().await {
            Ok(data) => {
                let signature = imp.signature();
                return Ok((data, signature));
            }
            Err(e) => {
                log::info!("{} unavailable: {:#}", imp.signature(), e);
                // Continue to the next implementation
            }
        }
    }
    Err(anyhow!("All async implementations failed to create data"))
}

/// Bar history of one volume index as stored on disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredSeries {
    pub instrument: InstrumentId,
    pub interval_ms: i64,
    pub bars: Vec<VolumeBar>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct SeriesCollection {
    pub name: String, // e.g. "Synthetic Breadth Sessions"
    pub version: f64,
    pub series: Vec<StoredSeries>,
}

impl SeriesCollection {
    pub fn unique_symbols(&self) -> Vec<String> {
        self.series
            .iter()
            .map(|s| s.instrument.symbol.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn find(&self, symbol: &str, connection: &str) -> Option<&StoredSeries> {
        self.series
            .iter()
            .find(|s| s.instrument.symbol == symbol && s.instrument.connection == connection)
    }

    /// Latest bar timestamp over every series.
    pub fn last_timestamp_ms(&self) -> Option<i64> {
        self.series
            .iter()
            .filter_map(|s| s.bars.iter().map(|b| b.timestamp_ms).max())
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;
    struct Fixed(&'static str);

    #[async_trait]
    impl CreateSeriesCollection for Failing {
        async fn create_collection(&self) -> Result<SeriesCollection> {
            Err(anyhow!("nothing here"))
        }
        fn signature(&self) -> &'static str {
            "Failing"
        }
    }

    #[async_trait]
    impl CreateSeriesCollection for Fixed {
        async fn create_collection(&self) -> Result<SeriesCollection> {
            Ok(SeriesCollection {
                name: self.0.to_string(),
                version: 1.0,
                series: Vec::new(),
            })
        }
        fn signature(&self) -> &'static str {
            self.0
        }
    }

    fn collection() -> SeriesCollection {
        let series = |symbol: &str, stamps: &[i64]| StoredSeries {
            instrument: InstrumentId::new(symbol, "dxFeed"),
            interval_ms: 10,
            bars: stamps.iter().map(|&ts| VolumeBar::new(ts, 1.0)).collect(),
        };
        SeriesCollection {
            name: "test".to_string(),
            version: 1.0,
            series: vec![
                series("$UVOL", &[10, 20]),
                series("$DVOL", &[10, 20, 30]),
                series("$UVOL", &[]),
            ],
        }
    }

    #[test]
    fn loader_chain_skips_failures() {
        let chain: Vec<Box<dyn CreateSeriesCollection>> =
            vec![Box::new(Failing), Box::new(Fixed("Second")), Box::new(Fixed("Third"))];

        let rt = tokio::runtime::Runtime::new().unwrap();
        let (data, signature) = rt.block_on(get_collection_async(&chain)).unwrap();

        assert_eq!(signature, "Second");
        assert_eq!(data.name, "Second");
    }

    #[test]
    fn loader_chain_fails_when_every_source_fails() {
        let chain: Vec<Box<dyn CreateSeriesCollection>> = vec![Box::new(Failing)];
        let rt = tokio::runtime::Runtime::new().unwrap();
        assert!(rt.block_on(get_collection_async(&chain)).is_err());
    }

    #[test]
    fn lookups_by_symbol_and_connection() {
        let data = collection();
        assert_eq!(data.unique_symbols(), vec!["$DVOL", "$UVOL"]);
        assert!(data.find("$DVOL", "dxFeed").is_some());
        assert!(data.find("$DVOL", "other").is_none());
        assert_eq!(data.last_timestamp_ms(), Some(30));
    }
}
