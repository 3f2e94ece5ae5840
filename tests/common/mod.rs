//! Shared test harness for integration tests.
//!
//! Provides MP4 byte builders and [`RangeServer`], a wiremock server that
//! serves a byte buffer the way a static file host answers range requests.

#![allow(dead_code)]

use std::time::Duration;

use moovprobe::config::Config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const VIDEO_PATH: &str = "/video.mp4";

// ---------------------------------------------------------------------------
// MP4 builders
// ---------------------------------------------------------------------------

/// A top-level box of `size` bytes with a zeroed body.
pub fn plain_box(tag: &[u8; 4], size: u32) -> Vec<u8> {
    let mut out = size.to_be_bytes().to_vec();
    out.extend_from_slice(tag);
    out.resize(size as usize, 0);
    out
}

/// A moov of `size` bytes whose first child is a version 0 mvhd.
pub fn movie_box(size: u32, timescale: u32, duration: u32) -> Vec<u8> {
    let mut out = size.to_be_bytes().to_vec();
    out.extend_from_slice(b"moov");
    out.extend_from_slice(&108u32.to_be_bytes());
    out.extend_from_slice(b"mvhd");
    out.extend_from_slice(&[0u8; 4]); // version + flags
    out.extend_from_slice(&[0u8; 8]); // creation + modification time
    out.extend_from_slice(&timescale.to_be_bytes());
    out.extend_from_slice(&duration.to_be_bytes());
    out.resize(size as usize, 0);
    out
}

/// ftyp (20 bytes) followed by an 800-byte moov: 1000 units/s, 30000 units.
pub fn thirty_second_mp4() -> Vec<u8> {
    let mut data = plain_box(b"ftyp", 20);
    data.extend(movie_box(800, 1000, 30000));
    data
}

/// A file with the moov at the end, behind a large mdat.
pub fn moov_at_end_mp4(mdat_size: u32, timescale: u32, duration: u32) -> Vec<u8> {
    let mut data = plain_box(b"ftyp", 32);
    data.extend(plain_box(b"free", 8));
    data.extend(plain_box(b"mdat", mdat_size));
    data.extend(movie_box(256, timescale, duration));
    data
}

// ---------------------------------------------------------------------------
// Range-serving mock
// ---------------------------------------------------------------------------

/// How the mock host treats `Range` headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeMode {
    /// 206 with exactly the requested bytes, 416 past the end.
    Honor,
    /// 200 with the whole file, ignoring `Range`.
    Ignore,
    /// 206 from the requested start to the end of the file.
    OpenEnded,
}

pub struct RangeResponder {
    data: Vec<u8>,
    mode: RangeMode,
}

impl RangeResponder {
    pub fn new(data: Vec<u8>, mode: RangeMode) -> Self {
        Self { data, mode }
    }
}

/// Parse `bytes=<start>-<end>`.
fn parse_range(header: &str) -> Option<(u64, u64)> {
    let value = header.strip_prefix("bytes=")?;
    let (start, end) = value.split_once('-')?;
    Some((start.parse().ok()?, end.parse().ok()?))
}

impl Respond for RangeResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let total = self.data.len() as u64;
        let range = request
            .headers
            .get("range")
            .and_then(|h| h.to_str().ok())
            .and_then(parse_range);

        let (start, end) = match (self.mode, range) {
            (RangeMode::Ignore, _) | (_, None) => {
                return ResponseTemplate::new(200).set_body_bytes(self.data.clone());
            }
            (_, Some(range)) => range,
        };

        if start >= total {
            return ResponseTemplate::new(416)
                .insert_header("Content-Range", format!("bytes */{}", total));
        }

        let end = match self.mode {
            RangeMode::OpenEnded => total - 1,
            _ => end.min(total - 1),
        };

        ResponseTemplate::new(206)
            .insert_header("Content-Range", format!("bytes {}-{}/{}", start, end, total))
            .set_body_bytes(self.data[start as usize..=end as usize].to_vec())
    }
}

struct DelayedResponder {
    inner: RangeResponder,
    delay: Duration,
}

impl Respond for DelayedResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.inner.respond(request).set_delay(self.delay)
    }
}

/// A mock host serving `data` at [`VIDEO_PATH`].
pub struct RangeServer {
    pub server: MockServer,
}

impl RangeServer {
    pub async fn start(data: Vec<u8>, mode: RangeMode) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VIDEO_PATH))
            .respond_with(RangeResponder::new(data, mode))
            .mount(&server)
            .await;
        Self { server }
    }

    /// A host that answers every request with `status` and an empty body.
    pub async fn with_status(status: u16) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        Self { server }
    }

    /// A host that answers correctly but only after `delay`.
    pub async fn slow(data: Vec<u8>, delay: Duration) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VIDEO_PATH))
            .respond_with(DelayedResponder {
                inner: RangeResponder::new(data, RangeMode::Honor),
                delay,
            })
            .mount(&server)
            .await;
        Self { server }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.server.uri(), VIDEO_PATH)
    }

    /// `Range` headers received so far, in order.
    pub async fn requested_ranges(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|r| r.headers.get("range"))
            .filter_map(|h| h.to_str().ok().map(str::to_string))
            .collect()
    }
}

/// Default configuration with a short timeout for tests.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.http.timeout_secs = 2;
    config
}
