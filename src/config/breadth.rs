//! Indicator configuration: symbols, bar period and the lookback input.

use serde::{Deserialize, Serialize};

use crate::domain::Exchange;
use crate::utils::TimeUtils;

/// Up/down volume index names for one exchange.
pub struct ExchangeSymbols {
    pub up: &'static str,
    pub down: &'static str,
}

pub struct BreadthConfig {
    pub indicator_name: &'static str,
    /// Data connection the index symbols are resolved on
    pub connection_name: &'static str,
    /// Bar period requested from the history provider
    pub interval_ms: i64,
    /// Lookback window when no override is given (calendar days)
    pub default_lookback_days: i64,
    /// At most this many exchange pairs per engine
    pub max_tracked_pairs: usize,
    pub nyse: ExchangeSymbols,
    pub nasdaq: ExchangeSymbols,
}

pub const BREADTH: BreadthConfig = BreadthConfig {
    indicator_name: "VolumeBreadthLine",
    connection_name: "dxFeed",
    interval_ms: TimeUtils::MS_IN_15_MIN,
    default_lookback_days: 20,
    max_tracked_pairs: 2,
    nyse: ExchangeSymbols {
        up: "$UVOL",
        down: "$DVOL",
    },
    nasdaq: ExchangeSymbols {
        up: "$UVOLQ",
        down: "$DVOLQ",
    },
};

/// What to do with the other pairs when the primary pair fails to align.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentPolicy {
    /// Every pair aligns and publishes on its own.
    #[default]
    Independent,
    /// A primary miss abandons the whole tick, secondary pairs included.
    PrimaryGated,
}

/// Runtime settings for one engine instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BreadthSettings {
    /// Signed user input. Only its absolute value is used.
    pub lookback_days: i64,
    /// Primary exchange first.
    pub exchanges: Vec<Exchange>,
    pub interval_ms: i64,
    pub connection_name: String,
    pub alignment: AlignmentPolicy,
}

impl Default for BreadthSettings {
    fn default() -> Self {
        Self {
            lookback_days: BREADTH.default_lookback_days,
            exchanges: vec![Exchange::Nyse],
            interval_ms: BREADTH.interval_ms,
            connection_name: BREADTH.connection_name.to_string(),
            alignment: AlignmentPolicy::default(),
        }
    }
}

impl BreadthSettings {
    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn with_nasdaq(mut self) -> Self {
        if !self.exchanges.contains(&Exchange::Nasdaq) {
            self.exchanges.push(Exchange::Nasdaq);
        }
        self
    }

    pub fn with_alignment(mut self, alignment: AlignmentPolicy) -> Self {
        self.alignment = alignment;
        self
    }

    /// Lookback window actually fetched, in calendar days.
    pub fn effective_lookback_days(&self) -> u64 {
        self.lookback_days.unsigned_abs()
    }

    pub fn lookback_ms(&self) -> i64 {
        TimeUtils::days_to_ms(self.effective_lookback_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lookback_is_twenty_days() {
        let settings = BreadthSettings::default();
        assert_eq!(settings.effective_lookback_days(), 20);
        assert_eq!(settings.exchanges, vec![Exchange::Nyse]);
    }

    #[test]
    fn negative_lookback_is_normalized() {
        let settings = BreadthSettings::default().with_lookback_days(-15);
        assert_eq!(settings.effective_lookback_days(), 15);
        assert_eq!(settings.lookback_ms(), 15 * TimeUtils::MS_IN_D);
    }

    #[test]
    fn nasdaq_is_added_once() {
        let settings = BreadthSettings::default().with_nasdaq().with_nasdaq();
        assert_eq!(settings.exchanges, vec![Exchange::Nyse, Exchange::Nasdaq]);
    }
}
