use serde::{Deserialize, Serialize};

/// One historical sample of a volume index.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct VolumeBar {
    /// Bar open time, epoch milliseconds
    pub timestamp_ms: i64,
    pub close: f64,
}

impl VolumeBar {
    pub fn new(timestamp_ms: i64, close: f64) -> Self {
        Self {
            timestamp_ms,
            close,
        }
    }
}
