//! Error types for moovprobe-media.

use crate::mp4::BoxType;
use thiserror::Error;

/// Result type for moovprobe-media operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a [`RangeFetcher`](crate::RangeFetcher).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The resource does not honor partial-content delivery.
    #[error("Partial content unsupported: {0}")]
    Unsupported(String),

    /// The resource ended before `offset + length`.
    #[error("Short read at offset {offset}: requested {requested} bytes, received {received}")]
    ShortRead {
        offset: u64,
        requested: u64,
        received: u64,
    },

    /// Connectivity or timeout failure.
    #[error("Network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered the range request with an error status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// Local I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Create an unsupported error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Wrap any transport-level failure as a network error.
    pub fn network<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network(Box::new(err))
    }
}

/// Why an 8-byte box header could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("need 8 bytes, have {0}")]
    Truncated(usize),

    #[error("type tag {0:02x?} is not printable ASCII")]
    InvalidTag([u8; 4]),
}

/// Error type for a duration query.
///
/// Every variant is terminal for the query that produced it.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Malformed box header at offset {offset}: {source}")]
    MalformedHeader {
        offset: u64,
        #[source]
        source: HeaderError,
    },

    #[error("Unrecognized box type '{box_type}' at offset {offset}")]
    UnrecognizedBoxType { offset: u64, box_type: BoxType },

    #[error("Invalid size {size} for box '{box_type}' at offset {offset}")]
    InvalidBoxSize {
        offset: u64,
        box_type: BoxType,
        size: u32,
    },

    #[error("Movie header at offset {offset} declares a timescale of 0")]
    ZeroTimescale { offset: u64 },

    #[error("Stream ended at offset {offset} before a moov box was found")]
    MovieBoxNotFound { offset: u64 },

    #[error("Traversal limit exceeded at offset {offset} after {boxes} boxes")]
    TraversalLimitExceeded { offset: u64, boxes: usize },

    #[error("Expected mvhd as first moov child at offset {offset}, found '{found}'")]
    UnexpectedMovieHeader { offset: u64, found: BoxType },

    #[error("Unsupported mvhd version {version} at offset {offset}")]
    UnsupportedMovieHeaderVersion { offset: u64, version: u8 },
}

impl Error {
    /// Byte offset the failure relates to, when it has one.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::Transport(TransportError::ShortRead { offset, .. }) => Some(*offset),
            Self::Transport(_) => None,
            Self::MalformedHeader { offset, .. }
            | Self::UnrecognizedBoxType { offset, .. }
            | Self::InvalidBoxSize { offset, .. }
            | Self::ZeroTimescale { offset }
            | Self::MovieBoxNotFound { offset }
            | Self::TraversalLimitExceeded { offset, .. }
            | Self::UnexpectedMovieHeader { offset, .. }
            | Self::UnsupportedMovieHeaderVersion { offset, .. } => Some(*offset),
        }
    }
}
