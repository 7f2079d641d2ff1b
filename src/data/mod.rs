// Data loading, caching, and replay
pub mod pre_main_async;
pub mod provider;
pub mod replay;
pub mod timeseries;

// Re-export commonly used types
pub use pre_main_async::fetch_breadth_data;
pub use provider::InMemoryProvider;
pub use replay::ReplayFeed;
pub use timeseries::SeriesCollection;
pub use timeseries::serde_version::{spawn_cache_write, write_collection_async};
