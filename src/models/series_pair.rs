use crate::domain::Exchange;
use crate::models::volume_series::VolumeSeries;

/// One exchange's up-volume and down-volume histories.
/// Both are required for the exchange to produce output.
#[derive(Debug)]
pub struct SeriesPair {
    pub exchange: Exchange,
    pub up: VolumeSeries,
    pub down: VolumeSeries,
}

impl SeriesPair {
    pub fn new(exchange: Exchange, up: VolumeSeries, down: VolumeSeries) -> Self {
        Self { exchange, up, down }
    }

    pub fn bar_count(&self) -> (usize, usize) {
        (self.up.len(), self.down.len())
    }
}
