//! Configuration and CLI argument handling

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::{error::ShutdownError, signals::SignalSet};

/// Cleanup timeout used when none is configured
pub const DEFAULT_CLEANUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings of a coordination cycle
#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    /// Deadline given to the cleanup operation, measured from cancellation
    pub cleanup_timeout: Duration,
    /// Signals that request shutdown
    pub signals: SignalSet,
}

impl ShutdownConfig {
    /// Override the cleanup timeout, which must be non-zero
    pub fn with_cleanup_timeout(mut self, timeout: Duration) -> Result<Self, ShutdownError> {
        if timeout.is_zero() {
            return Err(ShutdownError::InvalidConfig(
                "cleanup timeout must be greater than zero".to_string(),
            ));
        }
        self.cleanup_timeout = timeout;
        Ok(self)
    }

    pub fn with_signals(mut self, signals: SignalSet) -> Self {
        self.signals = signals;
        self
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            cleanup_timeout: DEFAULT_CLEANUP_TIMEOUT,
            signals: SignalSet::default(),
        }
    }
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "graceful-run")]
#[command(about = "Run a task until a termination signal, then clean up within a deadline")]
#[command(version)]
pub struct Config {
    #[command(subcommand)]
    pub mode: Option<Mode>,

    /// Port to bind the server to
    #[arg(short, long, default_value = "8080", global = true)]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1", global = true)]
    pub host: String,

    /// Seconds the cleanup step may take once shutdown begins
    #[arg(short, long, default_value = "5", global = true)]
    pub cleanup_timeout: u64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// What to run until shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Mode {
    /// Serve the HTTP status API until a termination signal arrives
    Serve,
    /// Print one line from the run step and one from the cleanup step
    Demo,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or(Mode::Serve)
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Build the coordinator settings from the CLI flags
    pub fn shutdown_config(&self) -> Result<ShutdownConfig, ShutdownError> {
        ShutdownConfig::default().with_cleanup_timeout(Duration::from_secs(self.cleanup_timeout))
    }
}
