//! Shutdown coordination module
//!
//! This module runs an operation until cancellation, then drives a
//! deadline-bounded cleanup and reconciles both outcomes.

pub mod phase;
pub mod runner;
pub mod scope;

// Re-export main types
pub use phase::{Outcome, Phase};
pub use runner::{run_until_cancel, run_until_shutdown, Coordinator};
pub use scope::CleanupScope;
