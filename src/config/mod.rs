mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config")?;
    validate_config(&config)?;
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./moovprobe.toml",
        "~/.config/moovprobe/config.toml",
        "/etc/moovprobe/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.http.timeout_secs == 0 {
        anyhow::bail!("http.timeout_secs cannot be 0");
    }

    for (name, value) in &config.http.headers {
        reqwest::header::HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("Invalid header name in http.headers: {:?}", name))?;
        reqwest::header::HeaderValue::from_str(value)
            .with_context(|| format!("Invalid value for header {:?}", name))?;
        if name.eq_ignore_ascii_case("range") {
            anyhow::bail!("http.headers cannot override the Range header");
        }
    }

    if config.walk.max_boxes == 0 {
        anyhow::bail!("walk.max_boxes cannot be 0");
    }

    if config.walk.max_offset == Some(0) {
        tracing::warn!("walk.max_offset is 0; only files starting with moov will resolve");
    }

    if config.probe.concurrency == 0 {
        anyhow::bail!("probe.concurrency cannot be 0");
    }

    Ok(())
}
