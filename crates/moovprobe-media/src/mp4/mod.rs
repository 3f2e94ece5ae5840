//! MP4 top-level box walking.
//!
//! This module locates the movie header of a non-fragmented MP4 by reading
//! top-level box headers through a [`RangeFetcher`](crate::RangeFetcher).

mod atoms;
mod walker;

pub use atoms::{
    BoxHeader, BoxType, MovieHeaderFields, BOX_HEADER_SIZE, MVHD_FIELDS_OFFSET, MVHD_FIELDS_SIZE,
};
pub use walker::{BoxWalker, WalkOptions, DEFAULT_MAX_BOXES};

/// Result of a successful duration query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct MovieDuration {
    /// Movie timescale (time units per second). Never zero.
    pub timescale: u32,
    /// Duration in timescale units.
    pub duration: u32,
    /// Offset of the moov box.
    pub moov_offset: u64,
    /// Top-level headers read, moov included.
    pub boxes_visited: usize,
    /// Range requests issued.
    pub fetches: u32,
    /// Total bytes received.
    pub bytes_fetched: u64,
}

impl MovieDuration {
    /// Get the duration in seconds.
    pub fn seconds(&self) -> f64 {
        self.duration as f64 / self.timescale as f64
    }
}
