use crate::data::timeseries::SeriesCollection;
use crate::domain::Exchange;
use crate::engine::UpdateEvent;

/// Bar-by-bar update stream driven by the primary up-volume series,
/// the way a chart host fires one update per bar of its main symbol.
#[derive(Debug, Clone)]
pub struct ReplayFeed {
    events: Vec<UpdateEvent>,
    cursor: usize,
}

impl ReplayFeed {
    pub fn new(timestamps: impl IntoIterator<Item = i64>) -> Self {
        let mut stamps: Vec<i64> = timestamps.into_iter().collect();
        stamps.sort_unstable();
        stamps.dedup();
        Self {
            events: stamps.into_iter().map(UpdateEvent::new_bar).collect(),
            cursor: 0,
        }
    }

    /// Replays every bar of `primary`'s up-volume series at or after `since_ms`.
    pub fn from_collection(
        collection: &SeriesCollection,
        primary: Exchange,
        connection: &str,
        since_ms: i64,
    ) -> Self {
        let stamps = collection
            .find(primary.up_symbol(), connection)
            .map(|s| {
                s.bars
                    .iter()
                    .map(|b| b.timestamp_ms)
                    .filter(|&ts| ts >= since_ms)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Self::new(stamps)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.events.len()
    }

    /// Up to `n` further events.
    pub fn next_batch(&mut self, n: usize) -> &[UpdateEvent] {
        let start = self.cursor;
        self.cursor = (start + n).min(self.events.len());
        &self.events[start..self.cursor]
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl Iterator for ReplayFeed {
    type Item = UpdateEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.events.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(event)
    }
}
