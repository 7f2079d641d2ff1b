// Core data structures
pub mod channels;
pub mod series_pair;
pub mod volume_series;

// Re-export commonly used types
pub use channels::{
    AlignedSample, ChannelPair, ChannelSnapshot, LabelTone, OverlayLabel, PublishedPair,
    RatioReading,
};
pub use series_pair::SeriesPair;
pub use volume_series::{HistoryLease, VolumeSeries};
