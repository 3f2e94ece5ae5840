//! Top-level box traversal.
//!
//! The walker reads one 8-byte header per top-level box and skips the body,
//! so the bytes transferred grow with the number of boxes ahead of `moov`
//! rather than with file size.
//!
//! Only the simple, non-fragmented layout is supported: the movie header is
//! assumed to be the first child of `moov` and to be version 0, which puts
//! timescale and duration at a fixed offset. Fragmented files keep their
//! duration elsewhere and are not handled. [`WalkOptions::verify_movie_header`]
//! checks the assumption at the cost of one extra fetch.

use bytes::Bytes;
use tracing::{debug, info, trace};

use super::atoms::{
    BoxHeader, BoxType, MovieHeaderFields, BOX_HEADER_SIZE, MVHD_FIELDS_OFFSET, MVHD_FIELDS_SIZE,
};
use super::MovieDuration;
use crate::error::{Error, Result, TransportError};
use crate::fetch::{ByteRange, RangeFetcher};

/// Smallest moov that can hold the mvhd fields read by the walker.
const MIN_MOOV_SIZE: u64 = BOX_HEADER_SIZE + MVHD_FIELDS_OFFSET + MVHD_FIELDS_SIZE;

/// mvhd header plus its version byte and flags.
const MVHD_PREFIX_SIZE: u64 = BOX_HEADER_SIZE + 4;

/// Default ceiling on top-level boxes visited per query.
pub const DEFAULT_MAX_BOXES: usize = 1024;

/// Traversal limits and checks for a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Maximum number of top-level headers read before giving up.
    pub max_boxes: usize,
    /// Highest offset a header may be read from.
    pub max_offset: Option<u64>,
    /// Confirm the first moov child is a version 0 mvhd before reading it.
    pub verify_movie_header: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_boxes: DEFAULT_MAX_BOXES,
            max_offset: None,
            verify_movie_header: false,
        }
    }
}

/// Per-query traversal state. Created fresh for every walk.
#[derive(Debug, Default)]
struct TraversalState {
    current_offset: u64,
    boxes_visited: usize,
    fetches: u32,
    bytes_fetched: u64,
}

enum WalkState {
    Scanning,
    FoundMovieBox { offset: u64 },
    Done(MovieDuration),
}

/// Walks the top-level boxes of a resource until it reaches `moov`.
pub struct BoxWalker<F> {
    fetcher: F,
    options: WalkOptions,
}

impl<F: RangeFetcher> BoxWalker<F> {
    /// Create a walker with default options.
    pub fn new(fetcher: F) -> Self {
        Self::with_options(fetcher, WalkOptions::default())
    }

    pub fn with_options(fetcher: F, options: WalkOptions) -> Self {
        Self { fetcher, options }
    }

    /// Duration of the movie in seconds.
    pub async fn duration_secs(&self) -> Result<f64> {
        Ok(self.probe().await?.seconds())
    }

    /// Walk from offset 0 and decode the movie header.
    ///
    /// Each call is an independent query with its own traversal state.
    pub async fn probe(&self) -> Result<MovieDuration> {
        let mut traversal = TraversalState::default();
        let mut state = WalkState::Scanning;

        loop {
            state = match state {
                WalkState::Scanning => self.scan(&mut traversal).await?,
                WalkState::FoundMovieBox { offset } => {
                    WalkState::Done(self.read_movie_header(&mut traversal, offset).await?)
                }
                WalkState::Done(duration) => {
                    info!(
                        seconds = duration.seconds(),
                        boxes = duration.boxes_visited,
                        bytes = duration.bytes_fetched,
                        "Resolved movie duration"
                    );
                    return Ok(duration);
                }
            };
        }
    }

    /// Read and act on the header at the current offset.
    async fn scan(&self, traversal: &mut TraversalState) -> Result<WalkState> {
        let offset = traversal.current_offset;
        self.check_limits(traversal)?;

        let data = match self
            .fetch(traversal, ByteRange::new(offset, BOX_HEADER_SIZE))
            .await
        {
            Ok(data) => data,
            Err(TransportError::ShortRead { .. }) => {
                return Err(Error::MovieBoxNotFound { offset });
            }
            Err(e) => return Err(e.into()),
        };

        let header =
            BoxHeader::decode(&data).map_err(|source| Error::MalformedHeader { offset, source })?;
        traversal.boxes_visited += 1;

        debug!(offset, box_type = %header.box_type, size = header.size, "Read box header");

        if !header.box_type.is_top_level() {
            return Err(Error::UnrecognizedBoxType {
                offset,
                box_type: header.box_type,
            });
        }

        if !header.has_valid_size() {
            return Err(Error::InvalidBoxSize {
                offset,
                box_type: header.box_type,
                size: header.size,
            });
        }

        if header.box_type == BoxType::MOOV {
            if u64::from(header.size) < MIN_MOOV_SIZE {
                return Err(Error::InvalidBoxSize {
                    offset,
                    box_type: header.box_type,
                    size: header.size,
                });
            }
            return Ok(WalkState::FoundMovieBox { offset });
        }

        traversal.current_offset = offset
            .checked_add(u64::from(header.size))
            .ok_or(Error::TraversalLimitExceeded {
                offset,
                boxes: traversal.boxes_visited,
            })?;

        Ok(WalkState::Scanning)
    }

    fn check_limits(&self, traversal: &TraversalState) -> Result<()> {
        let over_offset = self
            .options
            .max_offset
            .map_or(false, |max| traversal.current_offset > max);

        if traversal.boxes_visited >= self.options.max_boxes || over_offset {
            return Err(Error::TraversalLimitExceeded {
                offset: traversal.current_offset,
                boxes: traversal.boxes_visited,
            });
        }
        Ok(())
    }

    /// Decode timescale and duration from the mvhd at the start of `moov`.
    async fn read_movie_header(
        &self,
        traversal: &mut TraversalState,
        moov_offset: u64,
    ) -> Result<MovieDuration> {
        let body_offset = moov_offset + BOX_HEADER_SIZE;

        if self.options.verify_movie_header {
            self.verify_movie_header(traversal, body_offset).await?;
        }

        let fields_offset = body_offset + MVHD_FIELDS_OFFSET;
        let data = self
            .fetch(traversal, ByteRange::new(fields_offset, MVHD_FIELDS_SIZE))
            .await?;

        let fields = MovieHeaderFields::decode(&data).ok_or(TransportError::ShortRead {
            offset: fields_offset,
            requested: MVHD_FIELDS_SIZE,
            received: data.len() as u64,
        })?;

        let seconds = fields.duration_secs().ok_or(Error::ZeroTimescale {
            offset: fields_offset,
        })?;

        debug!(
            offset = fields_offset,
            timescale = fields.timescale,
            duration = fields.duration,
            seconds,
            "Read movie header fields"
        );

        Ok(MovieDuration {
            timescale: fields.timescale,
            duration: fields.duration,
            moov_offset,
            boxes_visited: traversal.boxes_visited,
            fetches: traversal.fetches,
            bytes_fetched: traversal.bytes_fetched,
        })
    }

    async fn verify_movie_header(&self, traversal: &mut TraversalState, offset: u64) -> Result<()> {
        let data = self
            .fetch(traversal, ByteRange::new(offset, MVHD_PREFIX_SIZE))
            .await?;

        let header =
            BoxHeader::decode(&data).map_err(|source| Error::MalformedHeader { offset, source })?;
        if header.box_type != BoxType::MVHD {
            return Err(Error::UnexpectedMovieHeader {
                offset,
                found: header.box_type,
            });
        }

        let version = data[BOX_HEADER_SIZE as usize];
        if version != 0 {
            return Err(Error::UnsupportedMovieHeaderVersion { offset, version });
        }
        Ok(())
    }

    /// Fetch and hold the fetcher to its exact-length contract.
    async fn fetch(
        &self,
        traversal: &mut TraversalState,
        range: ByteRange,
    ) -> std::result::Result<Bytes, TransportError> {
        trace!(offset = range.offset(), length = range.length(), "Fetching range");
        let mut data = self.fetcher.fetch(range).await?;
        traversal.fetches += 1;
        traversal.bytes_fetched += data.len() as u64;

        let received = data.len() as u64;
        if received < range.length() {
            return Err(TransportError::ShortRead {
                offset: range.offset(),
                requested: range.length(),
                received,
            });
        }
        data.truncate(range.length() as usize);
        Ok(data)
    }
}
