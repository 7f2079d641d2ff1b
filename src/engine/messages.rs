use crate::domain::Exchange;
use crate::error::BreadthError;
use crate::models::PublishedPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// A new bar opened
    NewBar,
    /// The current bar changed
    Tick,
}

/// Delivered by the host once per bar (or per tick, depending on granularity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateEvent {
    /// Reference time of the bar being processed, epoch ms
    pub timestamp_ms: i64,
    pub kind: UpdateKind,
}

impl UpdateEvent {
    pub fn new_bar(timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            kind: UpdateKind::NewBar,
        }
    }

    pub fn tick(timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            kind: UpdateKind::Tick,
        }
    }
}

/// What one update did.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub timestamp_ms: i64,
    /// Pairs whose channels were published, in tracking order
    pub published: Vec<PublishedPair>,
    /// Pairs that could not be aligned on this update
    pub missed: Vec<(Exchange, BreadthError)>,
    /// The primary pair missed under the gated policy and nothing was published
    pub aborted: bool,
}

impl UpdateOutcome {
    pub fn aborted(timestamp_ms: i64, exchange: Exchange, error: BreadthError) -> Self {
        Self {
            timestamp_ms,
            published: Vec::new(),
            missed: vec![(exchange, error)],
            aborted: true,
        }
    }

    pub fn published_nothing(&self) -> bool {
        self.published.is_empty()
    }
}
