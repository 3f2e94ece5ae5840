use std::collections::BTreeMap;

use moovprobe_media::WalkOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub walk: WalkConfig,

    #[serde(default)]
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Timeout for a single range request, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Extra headers sent with every range request (e.g. Authorization)
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_timeout() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("moovprobe/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            headers: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalkConfig {
    /// Give up after this many top-level boxes
    #[serde(default = "default_max_boxes")]
    pub max_boxes: usize,

    /// Give up once the next header would be read past this offset
    #[serde(default)]
    pub max_offset: Option<u64>,

    /// Check that moov starts with a version 0 mvhd before trusting its layout
    #[serde(default)]
    pub verify_movie_header: bool,
}

fn default_max_boxes() -> usize {
    moovprobe_media::mp4::DEFAULT_MAX_BOXES
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_boxes: default_max_boxes(),
            max_offset: None,
            verify_movie_header: false,
        }
    }
}

impl From<&WalkConfig> for WalkOptions {
    fn from(config: &WalkConfig) -> Self {
        WalkOptions {
            max_boxes: config.max_boxes,
            max_offset: config.max_offset,
            verify_movie_header: config.verify_movie_header,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Independent queries allowed in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    4
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}
