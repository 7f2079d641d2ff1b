// Domain types and value objects
pub mod exchange;
pub mod instrument;
pub mod volume_bar;

// Re-export commonly used types
pub use exchange::Exchange;
pub use instrument::{InstrumentId, SymbolHandle};
pub use volume_bar::VolumeBar;
