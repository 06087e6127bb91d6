// src/fetch.rs

use crate::config::Config;
use crate::error::SourceError;
use crate::grid::Grid;
use anyhow::Context;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT},
    redirect, Client,
};
use std::{future::Future, path::PathBuf, time::Duration};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Build the CSV export URL for a Google Sheets document id.
pub fn sheet_export_url(sheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv")
}

/// Somewhere a fresh copy of the schedule grid can be obtained from.
/// Each call fetches anew; nothing is cached between calls.
pub trait DocumentSource: Send + Sync + 'static {
    fn fetch_grid(&self) -> impl Future<Output = Result<Grid, SourceError>> + Send;
}

/// Downloads the published sheet over HTTP.
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: Client,
    url: Url,
    max_retries: u32,
    initial_backoff: Duration,
}

impl HttpSource {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let url = Url::parse(&config.sheet_url)
            .with_context(|| format!("parsing sheet URL {}", config.sheet_url))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("text/csv,*/*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static("https://docs.google.com/"));

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .redirect(redirect::Policy::limited(10))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url,
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn get_bytes_core(&self) -> Result<Vec<u8>, reqwest::Error> {
        let resp = self.client.get(self.url.clone()).send().await?;
        let status = resp.status();
        debug!(url = %self.url, %status, "response received");
        let resp = resp.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }

    /// Retries transport failures with exponential backoff. A non-success
    /// status is returned straight away.
    async fn get_bytes_with_retry(&self) -> Result<Vec<u8>, SourceError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.get_bytes_core().await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.is_status() => {
                    let status = e.status().unwrap_or_default();
                    error!(url = %self.url, %status, "upstream rejected request");
                    return Err(SourceError::Status {
                        url: self.url.to_string(),
                        status,
                    });
                }
                Err(e) if attempts <= self.max_retries => {
                    let backoff = backoff_delay(self.initial_backoff, attempts);
                    warn!(url = %self.url, attempt = attempts, delay_ms = backoff.as_millis() as u64, error = %e, "Retrying");
                    sleep(backoff).await;
                }
                Err(e) => {
                    error!(url = %self.url, error = %e, "Exhausted retries");
                    return Err(SourceError::Request {
                        url: self.url.to_string(),
                        attempts,
                        source: e,
                    });
                }
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based): doubles each time and
/// saturates instead of overflowing.
fn backoff_delay(initial: Duration, attempt: u32) -> Duration {
    initial.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

impl DocumentSource for HttpSource {
    #[instrument(level = "info", skip(self), fields(url = %self.url))]
    async fn fetch_grid(&self) -> Result<Grid, SourceError> {
        let bytes = self.get_bytes_with_retry().await?;
        let grid = Grid::from_csv_bytes(&bytes)?;
        info!(bytes = bytes.len(), rows = grid.row_count(), "fetched schedule grid");
        Ok(grid)
    }
}

/// Reads the export from a local CSV file on every call.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    async fn fetch_grid(&self) -> Result<Grid, SourceError> {
        let path = self.path.clone();
        let data = tokio::fs::read(&path).await.map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Grid::from_csv_bytes(&data)
    }
}
