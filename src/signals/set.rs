//! Ordered, non-empty signal sets

use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};

use crate::error::ShutdownError;

/// Ordered set of signal numbers, never empty and free of duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSet {
    signals: Vec<i32>,
}

impl SignalSet {
    /// Create a set from one required signal and any number of extra ones
    pub fn new(first: i32, rest: impl IntoIterator<Item = i32>) -> Self {
        let mut signals = vec![first];
        for signal in rest {
            if !signals.contains(&signal) {
                signals.push(signal);
            }
        }
        Self { signals }
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.signals
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.signals.iter().copied()
    }

    pub fn contains(&self, signal: i32) -> bool {
        self.signals.contains(&signal)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// A signal set is never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Signal names joined for log output
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(signal_name).collect()
    }
}

impl TryFrom<Vec<i32>> for SignalSet {
    type Error = ShutdownError;

    fn try_from(signals: Vec<i32>) -> Result<Self, Self::Error> {
        let mut iter = signals.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| ShutdownError::InvalidConfig("signal set must not be empty".to_string()))?;
        Ok(Self::new(first, iter))
    }
}

impl Default for SignalSet {
    fn default() -> Self {
        shutdown_signals()
    }
}

/// Signals treated as a request to shut down: interrupt, quit, terminate and hangup
pub fn shutdown_signals() -> SignalSet {
    SignalSet::new(SIGINT, [SIGQUIT, SIGTERM, SIGHUP])
}

/// Human readable name of a signal number
pub fn signal_name(signal: i32) -> &'static str {
    match signal {
        SIGINT => "SIGINT",
        SIGQUIT => "SIGQUIT",
        SIGTERM => "SIGTERM",
        SIGHUP => "SIGHUP",
        signal_hook::consts::SIGUSR1 => "SIGUSR1",
        signal_hook::consts::SIGUSR2 => "SIGUSR2",
        signal_hook::consts::SIGWINCH => "SIGWINCH",
        _ => "unknown",
    }
}
