// src/fetch/mod.rs
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use std::thread::sleep;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Blocking HTTP fetcher for the produce listing page, with bounded retry.
pub struct Fetcher {
    client: Client,
    url: Url,
    max_retries: u32,
    retry_backoff: Duration,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let url = Url::parse(&config.produce_url)
            .with_context(|| format!("parsing produce URL {}", config.produce_url))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            url,
            max_retries: config.max_retries.max(1),
            retry_backoff: Duration::from_secs(config.retry_backoff_secs),
        })
    }

    /// GET the listing page and return its body text. Transient failures
    /// (connection error, timeout, non-2xx, body read error) are retried
    /// with a linearly increasing delay; the last cause is surfaced once
    /// all attempts are spent.
    pub fn fetch(&self) -> Result<String> {
        let mut last_err = None;

        for attempt in 1..=self.max_retries {
            match self.try_fetch() {
                Ok(body) => {
                    info!(url = %self.url, attempt, bytes = body.len(), "fetched listing page");
                    return Ok(body);
                }
                Err(e) => {
                    warn!(url = %self.url, attempt, error = %e, "fetch attempt failed");
                    last_err = Some(e);
                    if attempt < self.max_retries {
                        sleep(self.retry_backoff * attempt);
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow!("no fetch attempts were made"))).with_context(
            || format!("GET {} failed after {} attempts", self.url, self.max_retries),
        )
    }

    fn try_fetch(&self) -> Result<String> {
        let resp = self
            .client
            .get(self.url.as_str())
            .send()
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()?;
        resp.text()
            .with_context(|| format!("reading body from {}", self.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_url() {
        let config = Config {
            produce_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(Fetcher::new(&config).is_err());
    }

    #[test]
    fn at_least_one_attempt() {
        // max_retries = 0 would otherwise skip the loop entirely.
        let config = Config {
            max_retries: 0,
            ..Config::default()
        };
        let fetcher = Fetcher::new(&config).unwrap();
        assert_eq!(fetcher.max_retries, 1);
    }
}
