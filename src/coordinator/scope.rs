//! Deadline-bearing scope handed to cleanup operations

use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};

/// Cancellation scope with a deadline, passed to a cleanup operation.
///
/// The deadline is advisory: nothing aborts the cleanup when it passes, so
/// cleanup code should race its work against [`CleanupScope::cancelled`].
#[derive(Debug, Clone)]
pub struct CleanupScope {
    token: CancellationToken,
    deadline: Instant,
    timeout: Duration,
}

impl CleanupScope {
    /// Create a scope from a fresh root token, expiring `timeout` from now.
    ///
    /// The guard releases the scope when dropped.
    pub(crate) fn new(timeout: Duration) -> (Self, DropGuard) {
        let root = CancellationToken::new();
        let scope = Self {
            token: root.child_token(),
            deadline: Instant::now() + timeout,
            timeout,
        };
        (scope, root.drop_guard())
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Timeout the scope was created with
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Time left before the deadline, zero once passed
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline || self.token.is_cancelled()
    }

    /// Token cancelled when the scope is released
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Resolve once the deadline passes or the scope is released
    pub async fn cancelled(&self) {
        tokio::select! {
            _ = sleep_until(self.deadline) => {}
            _ = self.token.cancelled() => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_is_in_the_future_and_bounded() {
        let before = Instant::now();
        let (scope, _guard) = CleanupScope::new(Duration::from_secs(5));

        assert!(scope.deadline() > before);
        assert!(scope.deadline() <= Instant::now() + Duration::from_secs(5));
        assert!(scope.remaining() > Duration::ZERO);
        assert!(!scope.is_expired());
        assert_eq!(scope.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_dropping_guard_releases_scope() {
        let (scope, guard) = CleanupScope::new(Duration::from_secs(60));
        drop(guard);

        assert!(scope.token().is_cancelled());
        assert!(scope.is_expired());
        tokio::time::timeout(Duration::from_secs(1), scope.cancelled())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_resolves_at_deadline() {
        let (scope, _guard) = CleanupScope::new(Duration::from_millis(20));
        tokio::time::timeout(Duration::from_secs(2), scope.cancelled())
            .await
            .unwrap();
        assert!(scope.is_expired());
        assert_eq!(scope.remaining(), Duration::ZERO);
    }
}
