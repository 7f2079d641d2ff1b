use crate::error::{BreadthError, Result};
use crate::models::{AlignedSample, SeriesPair, VolumeSeries};

/// Resolve both series of a pair to the bar at `timestamp_ms`.
///
/// Each series is searched on its own, so the up and down histories may hold
/// different bar counts or start at different times.
pub fn align(pair: &SeriesPair, timestamp_ms: i64) -> Result<AlignedSample> {
    let up_offset = locate(&pair.up, timestamp_ms)?;
    let down_offset = locate(&pair.down, timestamp_ms)?;

    Ok(AlignedSample {
        timestamp_ms,
        up: pair.up.close_at(up_offset)?,
        down: pair.down.close_at(down_offset)?,
    })
}

fn locate(series: &VolumeSeries, timestamp_ms: i64) -> Result<usize> {
    series
        .index_of_timestamp(timestamp_ms)
        .ok_or_else(|| BreadthError::AlignmentMiss {
            instrument: series.instrument.to_string(),
            timestamp_ms,
        })
}
