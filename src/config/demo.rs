//! Demo host settings: synthetic sessions, replay pacing and the viewer window.

use crate::utils::TimeUtils;

pub struct DemoConfig {
    pub window_title: &'static str,
    /// Regular session open, offset from UTC midnight
    pub session_open_offset_ms: i64,
    pub session_length_ms: i64,
    /// Typical total volume per bar
    pub nyse_bar_volume: f64,
    pub nasdaq_bar_volume: f64,
    /// Bars of the first session for which NASDAQ has not reported yet
    pub nasdaq_warmup_bars: usize,
    /// Bars the viewer replays per frame
    pub default_bars_per_frame: usize,
    /// Delay between headless/viewer frames
    pub frame_interval_ms: u64,
}

pub const DEMO: DemoConfig = DemoConfig {
    window_title: "Volume Breadth Line",
    session_open_offset_ms: TimeUtils::MS_IN_H * 14 + TimeUtils::MS_IN_30_MIN,
    session_length_ms: TimeUtils::MS_IN_H * 6 + TimeUtils::MS_IN_30_MIN,
    nyse_bar_volume: 40_000_000.0,
    nasdaq_bar_volume: 60_000_000.0,
    nasdaq_warmup_bars: 4,
    default_bars_per_frame: 1,
    frame_interval_ms: 50,
};
