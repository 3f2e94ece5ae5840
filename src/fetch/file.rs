//! Range fetches from a local file.

use std::io::SeekFrom;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use moovprobe_media::{ByteRange, RangeFetcher, TransportError};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::debug;

/// Upper bound on the buffer reserved up front for one read.
const MAX_PREALLOC: u64 = 64 * 1024;

/// Reads byte ranges of a local file, reopening it for each fetch.
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RangeFetcher for FileFetcher {
    async fn fetch(&self, range: ByteRange) -> Result<Bytes, TransportError> {
        debug!(path = ?self.path, offset = range.offset(), length = range.length(), "Reading range");

        let mut file = File::open(&self.path).await?;
        file.seek(SeekFrom::Start(range.offset())).await?;

        let mut data = Vec::with_capacity(range.length().min(MAX_PREALLOC) as usize);
        file.take(range.length()).read_to_end(&mut data).await?;

        let received = data.len() as u64;
        if received < range.length() {
            return Err(TransportError::ShortRead {
                offset: range.offset(),
                requested: range.length(),
                received,
            });
        }

        Ok(Bytes::from(data))
    }
}
