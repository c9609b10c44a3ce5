//! Graceful Run - run a task until a termination signal, then clean up
//!
//! This is the main entry point for the graceful-run application.

use tracing::info;
use tracing_subscriber::EnvFilter;

use graceful_run::{
    config::{Config, Mode},
    tasks::{demo_until_shutdown, serve_until_shutdown},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout only carries task output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("graceful_run={},tower_http=info", config.log_level()))),
        )
        .with_writer(std::io::stderr)
        .init();

    let shutdown_config = config.shutdown_config()?;
    info!(
        "Starting graceful-run v{} in {:?} mode (cleanup timeout {}s)",
        env!("CARGO_PKG_VERSION"),
        config.mode(),
        shutdown_config.cleanup_timeout.as_secs()
    );

    match config.mode() {
        Mode::Serve => serve_until_shutdown(&config.address(), shutdown_config).await?,
        Mode::Demo => demo_until_shutdown(shutdown_config).await?,
    }

    info!("Shutdown complete");
    Ok(())
}
