//! Runnable tasks module
//!
//! This module contains the operations the binary runs until shutdown.

pub mod demo;
pub mod serve;

// Re-export main functions
pub use demo::demo_until_shutdown;
pub use serve::serve_until_shutdown;
