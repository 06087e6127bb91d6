use anyhow::Result;
use schedule_service::{server, Config, HttpSource};
use std::env;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    info!("Starting schedule service");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::load()?;
    let source = HttpSource::new(&config)?;
    info!(url = %source.url(), "schedule source ready");

    // ─── 3) serve ────────────────────────────────────────────────────
    server::serve(source, config.port).await;

    Ok(())
}
