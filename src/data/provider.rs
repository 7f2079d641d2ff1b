use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::data::timeseries::{SeriesCollection, StoredSeries};
use crate::domain::{InstrumentId, SymbolHandle, VolumeBar};
use crate::engine::MarketDataProvider;
use crate::error::{BreadthError, Result};
use crate::models::{HistoryLease, VolumeSeries};

/// Market data served from a loaded series collection.
///
/// Every history handed out carries a lease, so the number of series still
/// held by consumers can be read back with [`InMemoryProvider::active_leases`].
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    directory: Vec<StoredSeries>,
    active: Arc<AtomicUsize>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_collection(collection: SeriesCollection) -> Self {
        Self {
            directory: collection.series,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_series(
        mut self,
        symbol: &str,
        connection: &str,
        interval_ms: i64,
        bars: Vec<VolumeBar>,
    ) -> Self {
        self.directory.push(StoredSeries {
            instrument: InstrumentId::new(symbol, connection),
            interval_ms,
            bars,
        });
        self
    }

    pub fn active_leases(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl MarketDataProvider for InMemoryProvider {
    fn resolve_symbol(&self, symbol: &str, connection: &str) -> Option<SymbolHandle> {
        self.directory
            .iter()
            .position(|s| s.instrument.symbol == symbol && s.instrument.connection == connection)
            .map(|key| SymbolHandle {
                id: self.directory[key].instrument.clone(),
                key,
            })
    }

    fn get_history(
        &self,
        handle: &SymbolHandle,
        interval_ms: i64,
        since_ms: i64,
    ) -> Result<VolumeSeries> {
        let stored = self
            .directory
            .get(handle.key)
            .filter(|s| s.instrument == handle.id)
            .ok_or_else(|| BreadthError::HistoryUnavailable {
                symbol: handle.id.symbol.clone(),
                reason: "handle was not issued by this provider".to_string(),
            })?;

        if stored.interval_ms != interval_ms {
            return Err(BreadthError::HistoryUnavailable {
                symbol: handle.id.symbol.clone(),
                reason: format!(
                    "stored at {}ms bars, {}ms requested",
                    stored.interval_ms, interval_ms
                ),
            });
        }

        let bars: Vec<VolumeBar> = stored
            .bars
            .iter()
            .filter(|bar| bar.timestamp_ms >= since_ms)
            .copied()
            .collect();

        Ok(
            VolumeSeries::new(stored.instrument.clone(), interval_ms, since_ms, bars)
                .with_lease(HistoryLease::acquire(&self.active)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> InMemoryProvider {
        InMemoryProvider::new().with_series(
            "$UVOL",
            "dxFeed",
            10,
            vec![
                VolumeBar::new(10, 1.0),
                VolumeBar::new(20, 2.0),
                VolumeBar::new(30, 3.0),
            ],
        )
    }

    #[test]
    fn resolves_only_on_the_matching_connection() {
        let provider = provider();
        let handle = provider.resolve_symbol("$UVOL", "dxFeed").unwrap();
        assert_eq!(handle.id, InstrumentId::new("$UVOL", "dxFeed"));
        assert!(provider.resolve_symbol("$UVOL", "other").is_none());
        assert!(provider.resolve_symbol("$DVOL", "dxFeed").is_none());
    }

    #[test]
    fn history_is_bounded_by_since() {
        let provider = provider();
        let handle = provider.resolve_symbol("$UVOL", "dxFeed").unwrap();

        let series = provider.get_history(&handle, 10, 20).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.first_timestamp_ms(), Some(20));
        assert_eq!(series.since_ms, 20);
    }

    #[test]
    fn leases_follow_series_lifetime() {
        let provider = provider();
        let handle = provider.resolve_symbol("$UVOL", "dxFeed").unwrap();

        let a = provider.get_history(&handle, 10, 0).unwrap();
        let b = provider.get_history(&handle, 10, 0).unwrap();
        assert_eq!(provider.active_leases(), 2);

        drop(a);
        assert_eq!(provider.active_leases(), 1);
        drop(b);
        assert_eq!(provider.active_leases(), 0);
    }

    #[test]
    fn wrong_period_is_unavailable() {
        let provider = provider();
        let handle = provider.resolve_symbol("$UVOL", "dxFeed").unwrap();

        assert!(matches!(
            provider.get_history(&handle, 60, 0),
            Err(BreadthError::HistoryUnavailable { .. })
        ));
        assert_eq!(provider.active_leases(), 0);
    }

    #[test]
    fn foreign_handle_is_unavailable() {
        let provider = provider();
        let handle = SymbolHandle {
            id: InstrumentId::new("$TICK", "dxFeed"),
            key: 0,
        };
        assert!(provider.get_history(&handle, 10, 0).is_err());
    }
}
