//! Duration queries.
//!
//! Each query gets its own fetcher and a fresh walk from offset 0. Queries
//! share nothing mutable, so [`Prober::probe_many`] runs several at once.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use moovprobe_media::{BoxWalker, MovieDuration, WalkOptions};
use reqwest::Client;
use tracing::{info, warn};

use crate::config::Config;
use crate::fetch::{build_client, open_fetcher, Locator, LocatorError};

/// Why a single query failed.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error(transparent)]
    Walk(#[from] moovprobe_media::Error),
}

/// Result of one query in a batch.
#[derive(Debug)]
pub struct ProbeOutcome {
    pub locator: String,
    pub result: Result<MovieDuration, ProbeError>,
}

/// Runs duration queries with a shared configuration.
pub struct Prober {
    client: Client,
    options: WalkOptions,
    concurrency: usize,
}

impl Prober {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: build_client(&config.http)?,
            options: WalkOptions::from(&config.walk),
            concurrency: config.probe.concurrency.max(1),
        })
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Query a single resource.
    pub async fn probe(&self, locator: &Locator) -> Result<MovieDuration, moovprobe_media::Error> {
        let fetcher = open_fetcher(locator, &self.client);
        let walker = BoxWalker::with_options(fetcher, self.options.clone());
        walker.probe().await
    }

    /// Parse a locator string and query it.
    pub async fn probe_str(&self, locator: &str) -> Result<MovieDuration, ProbeError> {
        let parsed: Locator = locator.parse()?;
        let duration = self.probe(&parsed).await?;
        info!(locator = %parsed, seconds = duration.seconds(), "Probed duration");
        Ok(duration)
    }

    /// Query many resources, keeping at most `concurrency` in flight.
    ///
    /// Outcomes are returned in input order.
    pub async fn probe_many<I>(&self, locators: I) -> Vec<ProbeOutcome>
    where
        I: IntoIterator<Item = String>,
    {
        stream::iter(locators)
            .map(|locator| async move {
                let result = self.probe_str(&locator).await;
                if let Err(ref e) = result {
                    warn!(locator = %locator, error = %e, "Probe failed");
                }
                ProbeOutcome { locator, result }
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

/// Query one resource with the given configuration.
pub async fn probe_locator(locator: &str, config: &Config) -> Result<MovieDuration> {
    let prober = Prober::new(config)?;
    Ok(prober.probe_str(locator).await?)
}
