//! Drives an engine over a loaded collection, one replayed bar at a time.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::BreadthSettings;
use crate::config::plot::PLOT_CONFIG;
use crate::data::{InMemoryProvider, ReplayFeed, SeriesCollection};
use crate::domain::Exchange;
use crate::engine::{
    BreadthRatioEngine, Clock, FixedClock, MarketDataProvider, PublishSink, SystemClock,
    UpdateEvent, UpdateOutcome,
};
use crate::error::Result;
use crate::utils::time_utils::epoch_ms_to_utc;

/// Running counts over a replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayTally {
    pub bars: usize,
    pub published: HashMap<Exchange, usize>,
    pub neutral: HashMap<Exchange, usize>,
    pub missed: HashMap<Exchange, usize>,
    pub aborted: usize,
}

impl ReplayTally {
    pub fn record(&mut self, outcome: &UpdateOutcome) {
        self.bars += 1;
        if outcome.aborted {
            self.aborted += 1;
        }
        for published in &outcome.published {
            *self.published.entry(published.exchange).or_default() += 1;
            if published.reading.is_neutral() {
                *self.neutral.entry(published.exchange).or_default() += 1;
            }
        }
        for (exchange, _) in &outcome.missed {
            *self.missed.entry(*exchange).or_default() += 1;
        }
    }

    pub fn published_for(&self, exchange: Exchange) -> usize {
        self.published.get(&exchange).copied().unwrap_or(0)
    }

    pub fn neutral_for(&self, exchange: Exchange) -> usize {
        self.neutral.get(&exchange).copied().unwrap_or(0)
    }

    pub fn missed_for(&self, exchange: Exchange) -> usize {
        self.missed.get(&exchange).copied().unwrap_or(0)
    }

    pub fn summary(&self, exchanges: &[Exchange]) -> String {
        let mut parts = vec![format!("{} bars", self.bars)];
        for &exchange in exchanges {
            parts.push(format!(
                "{}: {} published, {} neutral, {} missed",
                exchange,
                self.published_for(exchange),
                self.neutral_for(exchange),
                self.missed_for(exchange)
            ));
        }
        if self.aborted > 0 {
            parts.push(format!("{} aborted", self.aborted));
        }
        parts.join(" | ")
    }
}

pub struct DemoSession {
    pub engine: BreadthRatioEngine,
    pub feed: ReplayFeed,
    /// Which loader produced the data
    pub signature: &'static str,
    pub tally: ReplayTally,
    provider: Arc<InMemoryProvider>,
}

impl DemoSession {
    /// Build and initialize an engine over `collection`.
    /// The clock stops one bar after the newest stored bar, so the lookback
    /// window is measured back from the end of the data.
    pub fn new(
        collection: SeriesCollection,
        signature: &'static str,
        settings: BreadthSettings,
    ) -> Result<Self> {
        let clock: Arc<dyn Clock> = match collection.last_timestamp_ms() {
            Some(last) => Arc::new(FixedClock(last + settings.interval_ms)),
            None => Arc::new(SystemClock),
        };
        let since_ms = clock.now_ms().saturating_sub(settings.lookback_ms());
        let primary = settings.exchanges.first().copied().unwrap_or(Exchange::Nyse);
        let feed =
            ReplayFeed::from_collection(&collection, primary, &settings.connection_name, since_ms);

        let provider = Arc::new(InMemoryProvider::from_collection(collection));
        let dyn_provider: Arc<dyn MarketDataProvider> = provider.clone();
        let mut engine = BreadthRatioEngine::new(settings, dyn_provider, clock)?;
        engine.init()?;

        Ok(Self {
            engine,
            feed,
            signature,
            tally: ReplayTally::default(),
            provider,
        })
    }

    pub fn next_event(&mut self) -> Option<UpdateEvent> {
        self.feed.next()
    }

    pub fn apply(
        &mut self,
        event: &UpdateEvent,
        sink: &mut dyn PublishSink,
    ) -> Result<UpdateOutcome> {
        let outcome = self.engine.on_update(event, sink)?;
        self.tally.record(&outcome);
        Ok(outcome)
    }

    /// Start the replay over with a fresh engine state.
    pub fn restart(&mut self) -> Result<()> {
        self.engine.clear();
        self.engine.init()?;
        self.feed.rewind();
        self.tally = ReplayTally::default();
        Ok(())
    }

    /// Series still held from the provider.
    pub fn active_leases(&self) -> usize {
        self.provider.active_leases()
    }

    pub fn finish(&mut self) {
        self.engine.clear();
    }
}

/// One printable line per replayed bar.
pub fn bar_line(session: &DemoSession, outcome: &UpdateOutcome) -> String {
    let mut line = epoch_ms_to_utc(outcome.timestamp_ms);
    for label in session.engine.overlay_labels() {
        line.push_str("  ");
        line.push_str(&label.text(PLOT_CONFIG.label_digits));
    }
    for published in outcome.published.iter().filter(|p| p.reading.is_neutral()) {
        line.push_str(&format!("  [{} neutral]", published.exchange));
    }
    for (exchange, _) in &outcome.missed {
        line.push_str(&format!("  [{} missed]", exchange));
    }
    if outcome.aborted {
        line.push_str("  [aborted]");
    }
    line
}

/// Replay every bar without a window and print what was published.
pub fn run_headless(session: &mut DemoSession) -> Result<ReplayTally> {
    let mut sink = crate::engine::RecordingSink::default();
    log::info!(
        "Replaying {} bars from {} ({} pairs)",
        session.feed.len(),
        session.signature,
        session.engine.exchanges().len()
    );

    while let Some(event) = session.next_event() {
        let outcome = session.apply(&event, &mut sink)?;
        println!("{}", bar_line(session, &outcome));
        sink.writes.clear();
    }

    let exchanges = session.engine.exchanges().to_vec();
    println!("{}", session.tally.summary(&exchanges));
    session.finish();
    log::info!("Released histories, {} leases outstanding", session.active_leases());

    Ok(session.tally.clone())
}
