//! Coordination cycle phases

use serde::{Deserialize, Serialize};

use crate::error::ShutdownError;

/// Summary of how a coordination cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    RunFailed,
    CleanupFailed,
}

impl Outcome {
    pub fn from_result(result: &Result<(), ShutdownError>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(e) if e.is_cleanup() => Self::CleanupFailed,
            Err(_) => Self::RunFailed,
        }
    }
}

/// Phase of a coordination cycle.
///
/// Moves strictly forward: Idle, Running, CancelRequested, CleaningUp, Done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "outcome", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Running,
    CancelRequested,
    CleaningUp,
    Done(Outcome),
}

impl Phase {
    /// Create the initial phase
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Done(outcome) => Some(*outcome),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::CancelRequested => "cancel_requested",
            Self::CleaningUp => "cleaning_up",
            Self::Done(_) => "done",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_outcome_from_result() {
        assert_eq!(Outcome::from_result(&Ok(())), Outcome::Success);
        assert_eq!(
            Outcome::from_result(&Err(ShutdownError::run(anyhow!("foo")))),
            Outcome::RunFailed
        );
        assert_eq!(
            Outcome::from_result(&Err(ShutdownError::cleanup(anyhow!("bar")))),
            Outcome::CleanupFailed
        );
    }

    #[test]
    fn test_phase_serializes_with_outcome() {
        let json = serde_json::to_value(Phase::Done(Outcome::CleanupFailed)).unwrap();
        assert_eq!(json["phase"], "done");
        assert_eq!(json["outcome"], "cleanup_failed");

        let json = serde_json::to_value(Phase::Running).unwrap();
        assert_eq!(json["phase"], "running");
    }

    #[test]
    fn test_only_done_carries_outcome() {
        assert_eq!(Phase::default(), Phase::Idle);
        assert!(Phase::CleaningUp.outcome().is_none());
        assert!(Phase::Done(Outcome::Success).is_done());
        assert_eq!(Phase::Done(Outcome::Success).outcome(), Some(Outcome::Success));
    }
}
