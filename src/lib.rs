//! Graceful Run - run a long-lived task until a termination signal, then clean up
//!
//! This library starts an operation (typically a server), waits until a
//! cancellation token fires or a termination signal arrives, and then gives a
//! cleanup operation a bounded amount of time to finish. Errors from both
//! phases are reconciled into a single result.

pub mod config;
pub mod error;
pub mod signals;
pub mod coordinator;
pub mod state;
pub mod api;
pub mod tasks;

// Re-export commonly used types
pub use config::{Config, ShutdownConfig, DEFAULT_CLEANUP_TIMEOUT};
pub use error::ShutdownError;
pub use signals::{do_after_signal, shutdown_signals, SignalSet, SignalWatch};
pub use coordinator::{run_until_cancel, run_until_shutdown, CleanupScope, Coordinator, Outcome, Phase};
pub use tokio_util::sync::CancellationToken;
