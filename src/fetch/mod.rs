//! Transport collaborators for the box walker.
//!
//! A locator names where the bytes live: `http://` and `https://` URLs are
//! fetched with range requests, `file://` URLs and bare paths are read from
//! disk.

mod file;
mod http;

pub use file::FileFetcher;
pub use http::{build_client, HttpRangeFetcher};

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use moovprobe_media::RangeFetcher;
use reqwest::Client;

/// Errors from parsing a resource locator.
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    #[error("Empty locator")]
    Empty,

    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

/// Where a resource is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Http(String),
    File(PathBuf),
}

impl FromStr for Locator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LocatorError::Empty);
        }

        match s.split_once("://") {
            Some((scheme, rest)) => {
                let scheme = scheme.to_ascii_lowercase();
                match scheme.as_str() {
                    "http" | "https" => Ok(Self::Http(s.to_string())),
                    "file" if !rest.is_empty() => Ok(Self::File(PathBuf::from(rest))),
                    "file" => Err(LocatorError::Empty),
                    _ => Err(LocatorError::UnsupportedScheme(scheme)),
                }
            }
            None => Ok(Self::File(PathBuf::from(s))),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Create a fresh fetcher for one query.
pub fn open_fetcher(locator: &Locator, client: &Client) -> Box<dyn RangeFetcher> {
    match locator {
        Locator::Http(url) => Box::new(HttpRangeFetcher::new(client.clone(), url.clone())),
        Locator::File(path) => Box::new(FileFetcher::new(path.clone())),
    }
}
