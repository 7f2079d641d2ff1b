//! Configuration module for the volume breadth indicator.

pub mod breadth;

pub mod demo;

mod debug; // Private, use crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod persistence;
pub mod plot;

// Re-export commonly used items
pub use breadth::{BREADTH, BreadthSettings};
pub use demo::DEMO;
pub use persistence::{PERSISTENCE, series_cache_filename};
