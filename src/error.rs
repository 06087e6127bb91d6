// src/error.rs

use thiserror::Error;

/// Failures a schedule lookup can surface to its caller.
///
/// Row-level anomalies never appear here; they are absorbed while the grid
/// is read and show up as empty or absent field values instead.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("group '{0}' not found")]
    GroupNotFound(String),

    #[error("schedule document unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
}

/// Why the upstream document could not be turned into a grid.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("GET {url} failed after {attempts} attempt(s): {source}")]
    Request {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("document is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("reading document {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScheduleError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ScheduleError::GroupNotFound(_))
    }
}
