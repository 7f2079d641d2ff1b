//! Deterministic trading sessions for both exchanges.
//!
//! Each weekday gets one regular session of bars. The NYSE opening bar of every
//! session reports no down volume, and NASDAQ only starts reporting a few bars
//! into the first session, so replays hit both the neutral substitution and
//! the alignment-miss paths.

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Weekday};
use strum::IntoEnumIterator;

use crate::config::{BREADTH, DEMO, PERSISTENCE};
use crate::data::timeseries::{CreateSeriesCollection, SeriesCollection, StoredSeries};
use crate::domain::{Exchange, InstrumentId, VolumeBar};
use crate::utils::TimeUtils;

pub struct SyntheticVersion {
    /// Generation stops at this timestamp
    pub end_ms: i64,
    /// Calendar days covered before `end_ms`
    pub days: u64,
    pub interval_ms: i64,
}

#[async_trait]
impl CreateSeriesCollection for SyntheticVersion {
    fn signature(&self) -> &'static str {
        "Synthetic Sessions"
    }

    async fn create_collection(&self) -> Result<SeriesCollection> {
        if self.interval_ms <= 0 {
            bail!("Bar period must be positive, got {}ms", self.interval_ms);
        }
        Ok(generate_sessions(self.end_ms, self.days, self.interval_ms))
    }
}

pub fn generate_sessions(end_ms: i64, days: u64, interval_ms: i64) -> SeriesCollection {
    let connection = BREADTH.connection_name;
    let mut histories: Vec<(Exchange, Vec<VolumeBar>, Vec<VolumeBar>)> = Exchange::iter()
        .map(|exchange| (exchange, Vec::new(), Vec::new()))
        .collect();

    let last_day = TimeUtils::floor_to_interval(end_ms, TimeUtils::MS_IN_D);
    let first_day = last_day.saturating_sub(TimeUtils::days_to_ms(days));
    let bars_per_session = (DEMO.session_length_ms / interval_ms.max(1)) as usize;

    let mut session = 0_u64;
    let mut day = first_day;
    while day <= last_day {
        if is_weekday(day) {
            let open = day + DEMO.session_open_offset_ms;
            for bar in 0..bars_per_session {
                let ts = open + bar as i64 * interval_ms;
                if ts > end_ms {
                    break;
                }

                for (exchange, up_bars, down_bars) in histories.iter_mut() {
                    if !reports(*exchange, session, bar) {
                        continue;
                    }
                    let (up, mut down) = session_volume(*exchange, session, bar);
                    // Opening auction prints before any down-tick
                    if *exchange == Exchange::Nyse && bar == 0 {
                        down = 0.0;
                    }
                    up_bars.push(VolumeBar::new(ts, up));
                    down_bars.push(VolumeBar::new(ts, down));
                }
            }
            session += 1;
        }
        day += TimeUtils::MS_IN_D;
    }

    let stored = |symbol: &str, bars: Vec<VolumeBar>| StoredSeries {
        instrument: InstrumentId::new(symbol, connection),
        interval_ms,
        bars,
    };

    SeriesCollection {
        name: "Synthetic Breadth Sessions".to_string(),
        version: PERSISTENCE.series_version,
        series: histories
            .into_iter()
            .flat_map(|(exchange, up, down)| {
                [
                    stored(exchange.up_symbol(), up),
                    stored(exchange.down_symbol(), down),
                ]
            })
            .collect(),
    }
}

/// NASDAQ only starts reporting a few bars into the first session.
fn reports(exchange: Exchange, session: u64, bar: usize) -> bool {
    match exchange {
        Exchange::Nyse => true,
        Exchange::Nasdaq => session > 0 || bar >= DEMO.nasdaq_warmup_bars,
    }
}

fn is_weekday(day_ms: i64) -> bool {
    match DateTime::from_timestamp_millis(day_ms) {
        Some(dt) => !matches!(dt.weekday(), Weekday::Sat | Weekday::Sun),
        None => false,
    }
}

/// (up, down) whole-share volume for one bar.
fn session_volume(exchange: Exchange, session: u64, bar: usize) -> (f64, f64) {
    let (salt, scale) = match exchange {
        Exchange::Nyse => (1_u64, DEMO.nyse_bar_volume),
        Exchange::Nasdaq => (2_u64, DEMO.nasdaq_bar_volume),
    };
    let seed = (session << 20) ^ ((bar as u64) << 4) ^ salt;

    // Slow swing across the day plus per-bar noise
    let swing = (session as f64 * 0.9 + bar as f64 * 0.35 + salt as f64).sin();
    let share = (0.5 + 0.32 * swing + 0.25 * (unit_noise(seed) - 0.5)).clamp(0.04, 0.96);
    let total = (scale * (0.5 + unit_noise(seed ^ 0xA5A5))).round();

    let up = (total * share).round();
    (up, total - up)
}

/// splitmix64 folded into [0, 1)
fn unit_noise(seed: u64) -> f64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 11) as f64 / (1_u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn friday_close() -> i64 {
        Utc.with_ymd_and_hms(2024, 3, 15, 21, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn bars<'a>(data: &'a SeriesCollection, symbol: &str) -> &'a [VolumeBar] {
        &data.find(symbol, BREADTH.connection_name).unwrap().bars
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_sessions(friday_close(), 5, TimeUtils::MS_IN_15_MIN);
        let b = generate_sessions(friday_close(), 5, TimeUtils::MS_IN_15_MIN);
        assert_eq!(a, b);
    }

    #[test]
    fn one_session_per_weekday() {
        // Sat 9th .. Fri 15th: five sessions of 26 bars
        let data = generate_sessions(friday_close(), 6, TimeUtils::MS_IN_15_MIN);
        assert_eq!(bars(&data, "$UVOL").len(), 5 * 26);
        assert_eq!(bars(&data, "$DVOL").len(), 5 * 26);

        for bar in bars(&data, "$UVOL") {
            let dt = DateTime::from_timestamp_millis(bar.timestamp_ms).unwrap();
            assert!(!matches!(dt.weekday(), Weekday::Sat | Weekday::Sun));
        }
    }

    #[test]
    fn nyse_opening_bar_has_no_down_volume() {
        let data = generate_sessions(friday_close(), 0, TimeUtils::MS_IN_15_MIN);
        let down = bars(&data, "$DVOL");
        let up = bars(&data, "$UVOL");

        assert_eq!(down[0].close, 0.0);
        assert!(up[0].close > 0.0);
        assert!(down[1..].iter().all(|b| b.close > 0.0));
    }

    #[test]
    fn nasdaq_reports_late_in_the_first_session() {
        let data = generate_sessions(friday_close(), 1, TimeUtils::MS_IN_15_MIN);
        let nyse = bars(&data, "$UVOL");
        let nasdaq = bars(&data, "$UVOLQ");

        assert_eq!(
            nasdaq[0].timestamp_ms,
            nyse[DEMO.nasdaq_warmup_bars].timestamp_ms
        );
        assert_eq!(nasdaq.len(), nyse.len() - DEMO.nasdaq_warmup_bars);
    }

    #[test]
    fn generation_stops_at_end() {
        // 19:00 UTC falls exactly on a bar
        let end = friday_close() - 2 * TimeUtils::MS_IN_H;
        let data = generate_sessions(end, 0, TimeUtils::MS_IN_15_MIN);
        assert_eq!(data.last_timestamp_ms(), Some(end));
        assert_eq!(bars(&data, "$UVOL").len(), 19);
    }

    #[test]
    fn volumes_are_whole_numbers() {
        let data = generate_sessions(friday_close(), 3, TimeUtils::MS_IN_15_MIN);
        for series in &data.series {
            for bar in &series.bars {
                assert_eq!(bar.close.fract(), 0.0);
                assert!(bar.close >= 0.0);
            }
        }
    }

    #[test]
    fn rejects_a_non_positive_period() {
        let loader = SyntheticVersion {
            end_ms: friday_close(),
            days: 1,
            interval_ms: 0,
        };
        let rt = tokio::runtime::Runtime::new().unwrap();
        assert!(rt.block_on(loader.create_collection()).is_err());
    }
}
