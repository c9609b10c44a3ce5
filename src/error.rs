//! Error types surfaced by a coordination cycle

use thiserror::Error;

/// Error returned by the coordinator and the signal watcher
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// The run operation failed before cancellation was observed.
    ///
    /// Cleanup still ran. If it failed as well, its error is kept in
    /// `suppressed` instead of being returned.
    #[error("encountered an error while running: {source}")]
    Run {
        #[source]
        source: anyhow::Error,
        suppressed: Option<anyhow::Error>,
    },

    /// The cleanup operation failed
    #[error("encountered an error during cleanup: {source}")]
    Cleanup {
        #[source]
        source: anyhow::Error,
    },

    /// The OS refused to register the signal set
    #[error("failed to register signal handler: {0}")]
    SignalRegistration(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ShutdownError {
    /// Wrap a run-phase failure
    pub fn run(source: impl Into<anyhow::Error>) -> Self {
        Self::Run {
            source: source.into(),
            suppressed: None,
        }
    }

    /// Wrap a cleanup-phase failure
    pub fn cleanup(source: impl Into<anyhow::Error>) -> Self {
        Self::Cleanup {
            source: source.into(),
        }
    }

    pub fn is_run(&self) -> bool {
        matches!(self, Self::Run { .. })
    }

    pub fn is_cleanup(&self) -> bool {
        matches!(self, Self::Cleanup { .. })
    }

    /// Cleanup error that lost precedence to a run error, if any
    pub fn suppressed(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Run { suppressed, .. } => suppressed.as_ref(),
            _ => None,
        }
    }

    /// The caller's original error for run and cleanup failures
    pub fn phase_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Run { source, .. } | Self::Cleanup { source } => Some(source),
            _ => None,
        }
    }
}
