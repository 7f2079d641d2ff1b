use thiserror::Error;

use crate::engine::state::EngineState;

/// Errors raised by the breadth engine and its market-data seams.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BreadthError {
    #[error("no bar at or before {timestamp_ms} in {instrument}")]
    AlignmentMiss {
        instrument: String,
        timestamp_ms: i64,
    },

    #[error("division by zero (up {up}, down {down})")]
    DivisionByZero { up: f64, down: f64 },

    #[error("volume must be finite (up {up}, down {down})")]
    InvalidVolume { up: f64, down: f64 },

    #[error("symbol '{symbol}' not found on connection '{connection}'")]
    SymbolResolutionFailure { symbol: String, connection: String },

    #[error("bar offset {offset} out of range (series has {len} bars)")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("history for '{symbol}' unavailable: {reason}")]
    HistoryUnavailable { symbol: String, reason: String },

    #[error("invalid exchange tracking: {0}")]
    InvalidTracking(String),

    #[error("engine is {state}, operation needs an initialized engine")]
    NotReady { state: EngineState },
}

pub type Result<T> = std::result::Result<T, BreadthError>;
