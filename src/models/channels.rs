use crate::domain::Exchange;

/// Closing values of one exchange's up and down series at a common bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedSample {
    pub timestamp_ms: i64,
    pub up: f64,
    pub down: f64,
}

/// The ratio published for a bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatioReading {
    Measured(f64),
    /// Division by zero, published as 0.0
    Neutral,
}

impl RatioReading {
    pub fn value(&self) -> f64 {
        match self {
            RatioReading::Measured(ratio) => *ratio,
            RatioReading::Neutral => 0.0,
        }
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, RatioReading::Neutral)
    }
}

/// Display channels for one exchange. At most one side is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelPair {
    /// >= 0
    pub positive: f64,
    /// <= 0
    pub negative: f64,
}

impl ChannelPair {
    pub const ZERO: ChannelPair = ChannelPair {
        positive: 0.0,
        negative: 0.0,
    };
}

/// Everything published for one exchange on one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PublishedPair {
    pub exchange: Exchange,
    pub timestamp_ms: i64,
    pub reading: RatioReading,
    pub channels: ChannelPair,
}

/// Immutable view of the last published values, one slot per tracked exchange.
/// `None` means nothing has been published for that exchange yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSnapshot {
    exchanges: Vec<Exchange>,
    published: Vec<Option<PublishedPair>>,
}

impl ChannelSnapshot {
    pub fn empty(exchanges: &[Exchange]) -> Self {
        Self {
            exchanges: exchanges.to_vec(),
            published: vec![None; exchanges.len()],
        }
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn get(&self, exchange: Exchange) -> Option<&PublishedPair> {
        self.exchanges
            .iter()
            .position(|&e| e == exchange)
            .and_then(|idx| self.published[idx].as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Exchange, Option<&PublishedPair>)> {
        self.exchanges
            .iter()
            .copied()
            .zip(self.published.iter().map(|slot| slot.as_ref()))
    }

    /// A copy with the given slots overwritten. Untouched slots keep their values.
    pub fn with_updates(&self, updates: &[(usize, PublishedPair)]) -> Self {
        let mut next = self.clone();
        for (slot, pair) in updates {
            if let Some(entry) = next.published.get_mut(*slot) {
                *entry = Some(*pair);
            }
        }
        next
    }

    /// Flattened channel values in publish order (positive, negative per exchange).
    pub fn channel_values(&self) -> Vec<f64> {
        self.published
            .iter()
            .flat_map(|slot| {
                let channels = slot.map(|p| p.channels).unwrap_or(ChannelPair::ZERO);
                [channels.positive, channels.negative]
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTone {
    /// Taken from the positive channel
    Advancing,
    Declining,
}

/// The single number shown per exchange in the chart overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLabel {
    pub exchange: Exchange,
    /// `None` until the exchange has published
    pub value: Option<f64>,
    pub tone: LabelTone,
}

impl OverlayLabel {
    pub fn text(&self, digits: usize) -> String {
        let name = format!("{}:", self.exchange.label());
        match self.value {
            Some(value) => format!("{:<8}{:.*}", name, digits, value),
            None => format!("{:<8}--", name),
        }
    }
}
