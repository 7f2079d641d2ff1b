//! Seams between the engine and the platform that hosts it.

use eframe::egui::Color32;

use crate::domain::SymbolHandle;
use crate::error::Result;
use crate::models::VolumeSeries;
use crate::utils::time_utils::utc_now_as_timestamp_ms;

/// Symbol lookup and bar history. Implementations must be usable from the
/// engine thread while a painter holds another reference.
pub trait MarketDataProvider: Send + Sync {
    /// `None` when the symbol does not exist on that connection.
    fn resolve_symbol(&self, symbol: &str, connection: &str) -> Option<SymbolHandle>;

    /// Bars of `interval_ms` from `since_ms` up to the present.
    /// The returned series holds the history until it is dropped.
    fn get_history(
        &self,
        handle: &SymbolHandle,
        interval_ms: i64,
        since_ms: i64,
    ) -> Result<VolumeSeries>;
}

/// Per-bar output channels of the host chart.
pub trait PublishSink {
    fn set_channel_value(&mut self, channel: usize, value: f64);
}

/// Text drawing on the host chart, in pixels from the chart's top-left corner.
pub trait OverlaySink {
    fn draw_label(&mut self, text: &str, position: [f32; 2], color: Color32);
}

pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        utc_now_as_timestamp_ms()
    }
}

/// A clock stopped at one instant. Used for replays and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// Collects channel writes in memory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingSink {
    pub writes: Vec<(usize, f64)>,
}

impl RecordingSink {
    pub fn last_value(&self, channel: usize) -> Option<f64> {
        self.writes
            .iter()
            .rev()
            .find(|(c, _)| *c == channel)
            .map(|(_, v)| *v)
    }
}

impl PublishSink for RecordingSink {
    fn set_channel_value(&mut self, channel: usize, value: f64) {
        self.writes.push((channel, value));
    }
}
