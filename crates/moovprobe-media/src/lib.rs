//! Moovprobe-Media: read an MP4's duration without downloading it
//!
//! The duration of a non-fragmented MP4 lives in the movie header (`mvhd`),
//! the first child of the top-level `moov` box. This crate finds it by
//! walking top-level box headers through ranged reads, 8 bytes per box,
//! then reading the 8 bytes holding timescale and duration.
//!
//! # Modules
//!
//! - `fetch` - The [`RangeFetcher`] capability and an in-memory implementation
//! - `mp4` - Box header decoding and the [`BoxWalker`] state machine
//! - `error` - Transport and decoding failures
//!
//! # Example
//!
//! ```
//! use moovprobe_media::{BoxHeader, BoxType, BoxWalker, MemoryFetcher};
//!
//! let mut file = BoxHeader::new(20, BoxType::FTYP).encode().to_vec();
//! file.resize(20, 0);
//! file.extend_from_slice(&BoxHeader::new(44, BoxType::MOOV).encode());
//! file.extend_from_slice(&BoxHeader::new(36, BoxType::MVHD).encode());
//! file.extend_from_slice(&[0u8; 12]);
//! file.extend_from_slice(&1000u32.to_be_bytes());
//! file.extend_from_slice(&30000u32.to_be_bytes());
//!
//! let walker = BoxWalker::new(MemoryFetcher::new(file));
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! assert_eq!(rt.block_on(walker.duration_secs()).unwrap(), 30.0);
//! ```

pub mod error;
pub mod fetch;
pub mod mp4;

pub use error::{Error, HeaderError, Result, TransportError};
pub use fetch::{ByteRange, MemoryFetcher, RangeFetcher};
pub use mp4::{BoxHeader, BoxType, BoxWalker, MovieDuration, MovieHeaderFields, WalkOptions};
