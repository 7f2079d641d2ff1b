use chrono::{DateTime, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_5_MIN: i64 = Self::MS_IN_S * 60 * 5;
    pub const MS_IN_15_MIN: i64 = Self::MS_IN_S * 60 * 15;
    pub const MS_IN_30_MIN: i64 = Self::MS_IN_S * 60 * 30;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_4_H: i64 = Self::MS_IN_MIN * 60 * 4;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const MS_IN_W: i64 = Self::MS_IN_D * 7;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

    /// Convert a bar period in milliseconds to a shorthand (e.g. `15m`, `1h`).
    pub fn interval_to_string(interval_ms: i64) -> &'static str {
        match interval_ms {
            Self::MS_IN_S => "1s",
            Self::MS_IN_MIN => "1m",
            Self::MS_IN_5_MIN => "5m",
            Self::MS_IN_15_MIN => "15m",
            Self::MS_IN_30_MIN => "30m",
            Self::MS_IN_H => "1h",
            Self::MS_IN_4_H => "4h",
            Self::MS_IN_D => "1d",
            Self::MS_IN_W => "1w",
            _ => "unknown",
        }
    }

    /// Length of a calendar-day lookback window in milliseconds.
    pub fn days_to_ms(days: u64) -> i64 {
        (days as i64).saturating_mul(Self::MS_IN_D)
    }

    /// Floor a timestamp onto the start of its bar.
    pub fn floor_to_interval(timestamp_ms: i64, interval_ms: i64) -> i64 {
        if interval_ms <= 0 {
            return timestamp_ms;
        }
        timestamp_ms - timestamp_ms.rem_euclid(interval_ms)
    }
}

pub fn epoch_ms_to_utc(epoch_ms: i64) -> String {
    // Used for display purposes
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(TimeUtils::STANDARD_TIME_FORMAT).to_string(),
        None => String::from("invalid timestamp"),
    }
}

pub fn utc_now_as_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookback_days_convert_to_ms() {
        assert_eq!(TimeUtils::days_to_ms(0), 0);
        assert_eq!(TimeUtils::days_to_ms(15), 15 * 86_400_000);
    }

    #[test]
    fn timestamps_floor_to_bar_start() {
        let bar = TimeUtils::MS_IN_15_MIN;
        assert_eq!(TimeUtils::floor_to_interval(bar * 4 + 17, bar), bar * 4);
        assert_eq!(TimeUtils::floor_to_interval(bar * 4, bar), bar * 4);
    }

    #[test]
    fn interval_names() {
        assert_eq!(TimeUtils::interval_to_string(TimeUtils::MS_IN_15_MIN), "15m");
        assert_eq!(TimeUtils::interval_to_string(7), "unknown");
    }

    #[test]
    fn formats_epoch_ms() {
        assert_eq!(epoch_ms_to_utc(0), "1970-01-01 00:00");
    }
}
