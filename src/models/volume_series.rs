use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{InstrumentId, VolumeBar};
use crate::error::{BreadthError, Result};

// ============================================================================
// HistoryLease: marks a fetched history window as held by a consumer
// ============================================================================

/// Drop guard tying a fetched series to the provider that served it.
/// The provider's active count goes back down when the series is dropped.
#[derive(Debug)]
pub struct HistoryLease {
    active: Arc<AtomicUsize>,
}

impl HistoryLease {
    pub fn acquire(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self {
            active: Arc::clone(active),
        }
    }
}

impl Drop for HistoryLease {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// VolumeSeries: a bounded history window for one volume index
// ============================================================================

#[derive(Debug)]
pub struct VolumeSeries {
    pub instrument: InstrumentId,
    pub interval_ms: i64,
    /// Start of the retention window that was requested
    pub since_ms: i64,
    bars: Vec<VolumeBar>,
    _lease: Option<HistoryLease>,
}

impl VolumeSeries {
    pub fn new(
        instrument: InstrumentId,
        interval_ms: i64,
        since_ms: i64,
        mut bars: Vec<VolumeBar>,
    ) -> Self {
        // Lookups below rely on ascending timestamps
        bars.sort_by_key(|bar| bar.timestamp_ms);
        Self {
            instrument,
            interval_ms,
            since_ms,
            bars,
            _lease: None,
        }
    }

    pub fn with_lease(mut self, lease: HistoryLease) -> Self {
        self._lease = Some(lease);
        self
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[VolumeBar] {
        &self.bars
    }

    pub fn first_timestamp_ms(&self) -> Option<i64> {
        self.bars.first().map(|bar| bar.timestamp_ms)
    }

    pub fn last_timestamp_ms(&self) -> Option<i64> {
        self.bars.last().map(|bar| bar.timestamp_ms)
    }

    /// Offset of the bar stamped `timestamp_ms`, or of the latest bar before it.
    /// `None` when the series has no bar at or before the timestamp.
    pub fn index_of_timestamp(&self, timestamp_ms: i64) -> Option<usize> {
        let after = self
            .bars
            .partition_point(|bar| bar.timestamp_ms <= timestamp_ms);
        after.checked_sub(1)
    }

    pub fn close_at(&self, offset: usize) -> Result<f64> {
        self.bars
            .get(offset)
            .map(|bar| bar.close)
            .ok_or(BreadthError::OffsetOutOfRange {
                offset,
                len: self.bars.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i64, f64)]) -> VolumeSeries {
        let bars = points
            .iter()
            .map(|&(ts, close)| VolumeBar::new(ts, close))
            .collect();
        VolumeSeries::new(InstrumentId::new("$UVOL", "dxFeed"), 10, 0, bars)
    }

    #[test]
    fn exact_timestamp_resolves_to_its_bar() {
        let s = series(&[(10, 1.0), (20, 2.0), (30, 3.0)]);
        assert_eq!(s.index_of_timestamp(20), Some(1));
        assert_eq!(s.index_of_timestamp(30), Some(2));
    }

    #[test]
    fn gap_resolves_to_latest_earlier_bar() {
        let s = series(&[(10, 1.0), (30, 3.0)]);
        assert_eq!(s.index_of_timestamp(25), Some(0));
        assert_eq!(s.index_of_timestamp(99), Some(1));
    }

    #[test]
    fn before_first_bar_is_not_found() {
        let s = series(&[(10, 1.0), (20, 2.0)]);
        assert_eq!(s.index_of_timestamp(9), None);
        assert_eq!(series(&[]).index_of_timestamp(100), None);
    }

    #[test]
    fn unsorted_input_is_ordered() {
        let s = series(&[(30, 3.0), (10, 1.0), (20, 2.0)]);
        assert_eq!(s.first_timestamp_ms(), Some(10));
        assert_eq!(s.last_timestamp_ms(), Some(30));
        assert_eq!(s.close_at(2), Ok(3.0));
    }

    #[test]
    fn close_out_of_range_is_an_error() {
        let s = series(&[(10, 1.0)]);
        assert_eq!(
            s.close_at(1),
            Err(BreadthError::OffsetOutOfRange { offset: 1, len: 1 })
        );
    }

    #[test]
    fn lease_is_released_on_drop() {
        let active = Arc::new(AtomicUsize::new(0));
        let s = series(&[(10, 1.0)]).with_lease(HistoryLease::acquire(&active));
        assert_eq!(active.load(Ordering::SeqCst), 1);
        drop(s);
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }
}
