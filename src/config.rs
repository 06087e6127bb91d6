// src/config.rs

use crate::fetch::sheet_export_url;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fs, path::Path, str::FromStr};
use tracing::info;

/// Published schedule sheet served when nothing else is configured.
pub const DEFAULT_SHEET_ID: &str = "1JaL7-otunC3ERFqHM3UYDtAo-aM3ad_R";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Service settings. Precedence: defaults, then the YAML file named by
/// `SCHEDULE_CONFIG`, then individual environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub sheet_url: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            sheet_url: sheet_export_url(DEFAULT_SHEET_ID),
            request_timeout_secs: 30,
            max_retries: 2,
            initial_backoff_ms: 250,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load from `SCHEDULE_CONFIG` (if set) and the process environment.
    pub fn load() -> Result<Self> {
        let mut config = match env::var("SCHEDULE_CONFIG") {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        info!(port = config.port, sheet_url = %config.sheet_url, "configuration loaded");
        Ok(config)
    }

    /// Read a YAML file; keys that are left out keep their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Override fields from variables resolved through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = parse_var(&lookup, "PORT")? {
            self.port = port;
        }
        if let Some(id) = lookup("SCHEDULE_SHEET_ID") {
            self.sheet_url = sheet_export_url(id.trim());
        }
        if let Some(url) = lookup("SCHEDULE_SHEET_URL") {
            self.sheet_url = url.trim().to_string();
        }
        if let Some(secs) = parse_var(&lookup, "SCHEDULE_TIMEOUT_SECS")? {
            self.request_timeout_secs = secs;
        }
        if let Some(n) = parse_var(&lookup, "SCHEDULE_MAX_RETRIES")? {
            self.max_retries = n;
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}
