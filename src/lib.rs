//! Moovprobe: read the duration of a remote MP4 without downloading it.
//!
//! The box walking lives in `moovprobe-media`; this crate supplies the
//! transports it reads through, configuration, and query orchestration.

pub mod config;
pub mod fetch;
pub mod probe;

pub use moovprobe_media::{MovieDuration, WalkOptions};
