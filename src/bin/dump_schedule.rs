// src/bin/dump_schedule.rs
//
// Print one group's schedule as JSON.
//
//     dump_schedule <GROUP> [CSV_PATH]
//
// Without CSV_PATH the configured sheet is downloaded.

use anyhow::{Context, Result};
use schedule_service::{
    build_group_schedule,
    fetch::{DocumentSource, FileSource},
    Config, Grid, HttpSource,
};
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

async fn load_grid(path: Option<String>) -> Result<Grid> {
    let grid = match path {
        Some(p) => {
            info!(path = %p, "reading local export");
            FileSource::new(p).fetch_grid().await?
        }
        None => {
            let config = Config::load()?;
            HttpSource::new(&config)?.fetch_grid().await?
        }
    };
    Ok(grid)
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let group = args
        .next()
        .context("usage: dump_schedule <GROUP> [CSV_PATH]")?;
    let grid = load_grid(args.next()).await?;

    let schedule = build_group_schedule(&grid, &group)?;
    println!("{}", serde_json::to_string_pretty(&schedule)?);
    Ok(())
}
