use std::sync::Arc;

use crate::analysis::{align, reading_or_neutral, split};
use crate::config::breadth::AlignmentPolicy;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::{BREADTH, BreadthSettings};
use crate::domain::Exchange;
use crate::error::{BreadthError, Result};
use crate::models::{ChannelSnapshot, OverlayLabel, PublishedPair, SeriesPair, VolumeSeries};

use super::host::{Clock, MarketDataProvider, OverlaySink, PublishSink};
use super::messages::{UpdateEvent, UpdateOutcome};
use super::state::{EngineState, SnapshotReader};

/// Computes the signed up/down volume ratio per tracked exchange and
/// publishes it on two channels per exchange.
///
/// Channel layout: exchange `i` writes its positive side to channel `2i`
/// and its negative side to channel `2i + 1`.
pub struct BreadthRatioEngine {
    settings: BreadthSettings,
    provider: Arc<dyn MarketDataProvider>,
    clock: Arc<dyn Clock>,
    state: EngineState,

    /// Acquired histories, in tracking order. Dropping them releases the provider's leases.
    pairs: Vec<SeriesPair>,

    /// Last published values, shared with painters
    front: SnapshotReader,
}

impl BreadthRatioEngine {
    pub fn new(
        settings: BreadthSettings,
        provider: Arc<dyn MarketDataProvider>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        validate_tracking(&settings.exchanges)?;
        let front = SnapshotReader::new(ChannelSnapshot::empty(&settings.exchanges));

        Ok(Self {
            settings,
            provider,
            clock,
            state: EngineState::Uninitialized,
            pairs: Vec::new(),
            front,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn settings(&self) -> &BreadthSettings {
        &self.settings
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.settings.exchanges
    }

    pub fn channel_count(&self) -> usize {
        self.settings.exchanges.len() * 2
    }

    /// Bar counts of the held histories (up, down), in tracking order.
    pub fn history_sizes(&self) -> Vec<(Exchange, usize, usize)> {
        self.pairs
            .iter()
            .map(|pair| {
                let (up, down) = pair.bar_count();
                (pair.exchange, up, down)
            })
            .collect()
    }

    /// Resolve every tracked symbol and fetch its history window.
    /// Any symbol that cannot be resolved fails the whole initialization and
    /// nothing stays acquired.
    pub fn init(&mut self) -> Result<()> {
        if self.state.accepts_updates() {
            log::warn!(
                "{} already initialized ({}), ignoring init",
                BREADTH.indicator_name,
                self.state
            );
            return Ok(());
        }

        let since_ms = self.clock.now_ms().saturating_sub(self.settings.lookback_ms());

        let pairs = self
            .settings
            .exchanges
            .iter()
            .map(|&exchange| self.acquire_pair(exchange, since_ms))
            .collect::<Result<Vec<_>>>()?;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_init {
            for pair in &pairs {
                let (up, down) = pair.bar_count();
                log::info!(
                    "[{}] acquired {} up / {} down bars over {} days",
                    pair.exchange,
                    up,
                    down,
                    self.settings.effective_lookback_days()
                );
            }
        }

        self.pairs = pairs;
        self.front.store(ChannelSnapshot::empty(&self.settings.exchanges));
        self.state = EngineState::Ready;
        Ok(())
    }

    /// Process one bar: align, compute, split and publish every tracked pair.
    ///
    /// Under [`AlignmentPolicy::Independent`] a pair that misses alignment is
    /// skipped and reported in the outcome. Under
    /// [`AlignmentPolicy::PrimaryGated`] a primary miss abandons the update and
    /// nothing is published.
    pub fn on_update(
        &mut self,
        event: &UpdateEvent,
        sink: &mut dyn PublishSink,
    ) -> Result<UpdateOutcome> {
        if !self.state.accepts_updates() {
            return Err(BreadthError::NotReady { state: self.state });
        }
        self.state = EngineState::Running;

        let mut updates: Vec<(usize, PublishedPair)> = Vec::with_capacity(self.pairs.len());
        let mut missed = Vec::new();

        for (slot, pair) in self.pairs.iter().enumerate() {
            let sample = match align(pair, event.timestamp_ms) {
                Ok(sample) => sample,
                Err(e) => {
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_alignment_misses {
                        log::info!("[{}] skipped: {}", pair.exchange, e);
                    }

                    if slot == 0 && self.settings.alignment == AlignmentPolicy::PrimaryGated {
                        return Ok(UpdateOutcome::aborted(event.timestamp_ms, pair.exchange, e));
                    }
                    missed.push((pair.exchange, e));
                    continue;
                }
            };

            let reading = reading_or_neutral(pair.exchange, &sample);
            updates.push((
                slot,
                PublishedPair {
                    exchange: pair.exchange,
                    timestamp_ms: event.timestamp_ms,
                    reading,
                    channels: split(reading.value()),
                },
            ));
        }

        for (slot, published) in &updates {
            sink.set_channel_value(2 * slot, published.channels.positive);
            sink.set_channel_value(2 * slot + 1, published.channels.negative);

            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_publish {
                log::info!(
                    "[{}] {:?} at {} -> ({}, {})",
                    published.exchange,
                    published.reading,
                    published.timestamp_ms,
                    published.channels.positive,
                    published.channels.negative
                );
            }
        }

        if !updates.is_empty() {
            let next = self.front.load().with_updates(&updates);
            self.front.store(next);
        }

        Ok(UpdateOutcome {
            timestamp_ms: event.timestamp_ms,
            published: updates.into_iter().map(|(_, p)| p).collect(),
            missed,
            aborted: false,
        })
    }

    /// Release every acquired history. Safe to call repeatedly.
    pub fn clear(&mut self) {
        if self.state == EngineState::Cleared {
            return;
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_shutdown {
            log::info!("Releasing {} series pairs (was {})", self.pairs.len(), self.state);
        }

        self.pairs.clear();
        self.front.store(ChannelSnapshot::empty(&self.settings.exchanges));
        self.state = EngineState::Cleared;
    }

    pub fn snapshot(&self) -> Arc<ChannelSnapshot> {
        self.front.load()
    }

    /// A handle painters can keep. It follows every later publication.
    pub fn reader(&self) -> SnapshotReader {
        self.front.clone()
    }

    pub fn overlay_labels(&self) -> Vec<OverlayLabel> {
        self.front.labels()
    }

    pub fn paint(&self, sink: &mut dyn OverlaySink) {
        self.front.paint(sink);
    }

    fn acquire_pair(&self, exchange: Exchange, since_ms: i64) -> Result<SeriesPair> {
        let up = self.acquire_series(exchange.up_symbol(), since_ms)?;
        let down = self.acquire_series(exchange.down_symbol(), since_ms)?;
        Ok(SeriesPair::new(exchange, up, down))
    }

    fn acquire_series(&self, symbol: &str, since_ms: i64) -> Result<VolumeSeries> {
        let connection = self.settings.connection_name.as_str();
        let handle = self
            .provider
            .resolve_symbol(symbol, connection)
            .ok_or_else(|| BreadthError::SymbolResolutionFailure {
                symbol: symbol.to_string(),
                connection: connection.to_string(),
            })?;

        self.provider
            .get_history(&handle, self.settings.interval_ms, since_ms)
    }
}

fn validate_tracking(exchanges: &[Exchange]) -> Result<()> {
    if exchanges.is_empty() {
        return Err(BreadthError::InvalidTracking(
            "at least one exchange must be tracked".to_string(),
        ));
    }
    if exchanges.len() > BREADTH.max_tracked_pairs {
        return Err(BreadthError::InvalidTracking(format!(
            "{} exchanges requested, at most {} supported",
            exchanges.len(),
            BREADTH.max_tracked_pairs
        )));
    }
    for (i, exchange) in exchanges.iter().enumerate() {
        if exchanges[..i].contains(exchange) {
            return Err(BreadthError::InvalidTracking(format!(
                "{} tracked twice",
                exchange
            )));
        }
    }
    Ok(())
}
