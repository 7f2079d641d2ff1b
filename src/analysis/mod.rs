// Per-update computation: align, compute, split
pub mod aligner;
pub mod ratio;
pub mod splitter;

pub use aligner::align;
pub use ratio::{breadth_ratio, reading_or_neutral};
pub use splitter::{overlay_label, split};
