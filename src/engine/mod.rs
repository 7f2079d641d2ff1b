pub mod core;
pub mod host;
pub mod messages;
pub mod state;

// Re-export key components
pub use core::BreadthRatioEngine;
pub use host::{
    Clock, FixedClock, MarketDataProvider, OverlaySink, PublishSink, RecordingSink, SystemClock,
};
pub use messages::{UpdateEvent, UpdateKind, UpdateOutcome};
pub use state::{EngineState, SnapshotReader};
