//! Ranged byte access to a remote resource.
//!
//! The walker never holds a session or mutates request state: each call is
//! described completely by an immutable [`ByteRange`].

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::TransportError;

/// A request for `length` bytes starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    offset: u64,
    length: u64,
}

impl ByteRange {
    /// Create a range. `length` must be at least 1.
    pub const fn new(offset: u64, length: u64) -> Self {
        assert!(length > 0, "byte range length must be non-zero");
        Self { offset, length }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// Last byte covered by the range, as used in an HTTP `Range` header.
    pub fn end_inclusive(&self) -> u64 {
        self.offset.saturating_add(self.length - 1)
    }

    /// `bytes=<start>-<end>` form of this range.
    pub fn to_header_value(&self) -> String {
        format!("bytes={}-{}", self.offset, self.end_inclusive())
    }
}

/// Fetches an arbitrary byte range of a resource.
///
/// Implementations return exactly `range.length()` bytes or fail. They do
/// not cache or retry; a timed-out call surfaces as
/// [`TransportError::Network`].
#[async_trait]
pub trait RangeFetcher: Send + Sync {
    async fn fetch(&self, range: ByteRange) -> Result<Bytes, TransportError>;
}

#[async_trait]
impl<T: RangeFetcher + ?Sized> RangeFetcher for &T {
    async fn fetch(&self, range: ByteRange) -> Result<Bytes, TransportError> {
        (**self).fetch(range).await
    }
}

#[async_trait]
impl<T: RangeFetcher + ?Sized> RangeFetcher for Box<T> {
    async fn fetch(&self, range: ByteRange) -> Result<Bytes, TransportError> {
        (**self).fetch(range).await
    }
}

#[async_trait]
impl<T: RangeFetcher + ?Sized> RangeFetcher for std::sync::Arc<T> {
    async fn fetch(&self, range: ByteRange) -> Result<Bytes, TransportError> {
        (**self).fetch(range).await
    }
}

/// Serves ranges out of an in-memory buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    data: Bytes,
}

impl MemoryFetcher {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl RangeFetcher for MemoryFetcher {
    async fn fetch(&self, range: ByteRange) -> Result<Bytes, TransportError> {
        let len = self.len();
        let start = range.offset().min(len);
        let end = range.offset().saturating_add(range.length()).min(len);
        let received = end - start;

        if received < range.length() {
            return Err(TransportError::ShortRead {
                offset: range.offset(),
                requested: range.length(),
                received,
            });
        }

        Ok(self.data.slice(start as usize..end as usize))
    }
}
