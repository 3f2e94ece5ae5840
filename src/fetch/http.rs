//! Range fetches over HTTP.
//!
//! Every fetch is one GET carrying its own `Range` header; the client holds
//! no per-request state, so a single client can back many queries at once.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use moovprobe_media::{ByteRange, RangeFetcher, TransportError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_RANGE, RANGE};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::HttpConfig;

/// Build the HTTP client shared by range fetchers.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("Invalid header name: {:?}", name))?;
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("Invalid value for header {:?}", name))?;
        headers.insert(name, value);
    }

    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetches byte ranges of a single URL.
pub struct HttpRangeFetcher {
    client: Client,
    url: String,
}

impl HttpRangeFetcher {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl RangeFetcher for HttpRangeFetcher {
    async fn fetch(&self, range: ByteRange) -> Result<Bytes, TransportError> {
        let range_header = range.to_header_value();
        debug!(url = %self.url, range = %range_header, "Requesting range");

        let response = self
            .client
            .get(&self.url)
            .header(RANGE, range_header.as_str())
            .send()
            .await
            .map_err(TransportError::network)?;

        let status = response.status();
        match status {
            StatusCode::PARTIAL_CONTENT => {}
            StatusCode::RANGE_NOT_SATISFIABLE => {
                return Err(TransportError::ShortRead {
                    offset: range.offset(),
                    requested: range.length(),
                    received: 0,
                });
            }
            s if s.is_success() => {
                return Err(TransportError::unsupported(format!(
                    "{} answered {} to {}, expected 206 Partial Content",
                    self.url, s, range_header
                )));
            }
            s => return Err(TransportError::Status(s.as_u16())),
        }

        let served_start = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_content_range_start);
        if let Some(start) = served_start {
            if start != range.offset() {
                return Err(TransportError::unsupported(format!(
                    "{} served a range starting at {} for {}",
                    self.url, start, range_header
                )));
            }
        }

        let body = response.bytes().await.map_err(TransportError::network)?;
        let received = body.len() as u64;
        if received < range.length() {
            return Err(TransportError::ShortRead {
                offset: range.offset(),
                requested: range.length(),
                received,
            });
        }

        // Without Content-Range only an exact-length body can be placed.
        if served_start.is_none() && received != range.length() {
            return Err(TransportError::unsupported(format!(
                "{} answered {} with {} bytes and no Content-Range",
                self.url, range_header, received
            )));
        }

        Ok(body.slice(..range.length() as usize))
    }
}

/// Start offset of a `Content-Range` value such as `bytes 0-7/1000`.
fn parse_content_range_start(header: &str) -> Option<u64> {
    let value = header.trim().strip_prefix("bytes ")?;
    let (span, _total) = value.split_once('/')?;
    let (start, _end) = span.split_once('-')?;
    start.trim().parse().ok()
}
