use std::sync::{Arc, RwLock};

use crate::analysis::overlay_label;
use crate::config::plot::PLOT_CONFIG;
use crate::models::{ChannelSnapshot, LabelTone, OverlayLabel};

use super::host::OverlaySink;

/// Lifecycle of one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    /// Series acquired, no update processed yet
    Ready,
    Running,
    /// Series released
    Cleared,
}

impl EngineState {
    pub fn accepts_updates(&self) -> bool {
        matches!(self, EngineState::Ready | EngineState::Running)
    }
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Ready => "ready",
            EngineState::Running => "running",
            EngineState::Cleared => "cleared",
        };
        f.write_str(name)
    }
}

/// THE FRONT BUFFER.
/// Painters read the last published snapshot from here, from any thread.
/// A new snapshot replaces the `Arc` in a single assignment, so a reader
/// always sees either the old or the new values, never a mix.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    slot: Arc<RwLock<Arc<ChannelSnapshot>>>,
}

impl SnapshotReader {
    pub fn new(initial: ChannelSnapshot) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Arc::new(initial))),
        }
    }

    pub fn load(&self) -> Arc<ChannelSnapshot> {
        // A poisoned lock still holds a whole snapshot
        let guard = self.slot.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&guard)
    }

    /// The swap.
    pub(crate) fn store(&self, snapshot: ChannelSnapshot) {
        let next = Arc::new(snapshot);
        let mut guard = self.slot.write().unwrap_or_else(|p| p.into_inner());
        *guard = next;
    }

    pub fn labels(&self) -> Vec<OverlayLabel> {
        let snapshot = self.load();
        snapshot
            .iter()
            .map(|(exchange, published)| overlay_label(exchange, published))
            .collect()
    }

    /// Draw one label row per tracked exchange, primary on top.
    pub fn paint(&self, sink: &mut dyn OverlaySink) {
        let [x, y] = PLOT_CONFIG.label_offset;
        for (row, label) in self.labels().iter().enumerate() {
            let color = match label.tone {
                LabelTone::Advancing => PLOT_CONFIG.label_advancing_color,
                LabelTone::Declining => PLOT_CONFIG.label_declining_color,
            };
            let position = [x, y + row as f32 * PLOT_CONFIG.label_row_height];
            sink.draw_label(&label.text(PLOT_CONFIG.label_digits), position, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Exchange;
    use crate::models::{ChannelPair, PublishedPair, RatioReading};
    use std::thread;

    #[test]
    fn readers_keep_the_snapshot_they_loaded() {
        let reader = SnapshotReader::new(ChannelSnapshot::empty(&[Exchange::Nyse]));
        let before = reader.load();

        let published = PublishedPair {
            exchange: Exchange::Nyse,
            timestamp_ms: 1,
            reading: RatioReading::Measured(3.0),
            channels: ChannelPair {
                positive: 3.0,
                negative: 0.0,
            },
        };
        reader.store(before.with_updates(&[(0, published)]));

        assert!(before.get(Exchange::Nyse).is_none());
        assert_eq!(reader.load().get(Exchange::Nyse), Some(&published));
    }

    #[test]
    fn concurrent_reads_never_see_a_torn_pair() {
        let reader = SnapshotReader::new(ChannelSnapshot::empty(&[Exchange::Nyse]));
        let painter = reader.clone();

        let handle = thread::spawn(move || {
            for _ in 0..2_000 {
                let values = painter.load().channel_values();
                // Writer alternates (k, 0) and (0, -k)
                assert!(values[0] == 0.0 || values[1] == 0.0);
                if values[0] != 0.0 {
                    assert_eq!(values[0].fract(), 0.0);
                }
            }
        });

        for k in 1..2_000 {
            let ratio = if k % 2 == 0 { k as f64 } else { -(k as f64) };
            let channels = crate::analysis::split(ratio);
            let published = PublishedPair {
                exchange: Exchange::Nyse,
                timestamp_ms: k,
                reading: RatioReading::Measured(ratio),
                channels,
            };
            let next = reader.load().with_updates(&[(0, published)]);
            reader.store(next);
        }

        handle.join().unwrap();
    }
}
