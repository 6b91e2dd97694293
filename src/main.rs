//! pipeforge CLI entry point.
//!
//! Initializes logging and hands off to the CLI module.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = pipeforge::cli::parse_cli();

    // Log filter priority: RUST_LOG env var > --log-level CLI arg
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone());

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)))
        .init();

    pipeforge::cli::run_with_cli(cli).await
}
