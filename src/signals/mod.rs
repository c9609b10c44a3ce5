//! Signal handling module
//!
//! This module turns OS termination signals into a single in-process callback.

pub mod set;
pub mod watcher;

// Re-export main types
pub use set::{shutdown_signals, signal_name, SignalSet};
pub use watcher::{do_after_signal, SignalWatch};
