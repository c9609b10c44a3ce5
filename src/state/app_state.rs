//! Shared state of the status server

use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::coordinator::Phase;

/// State shared by the HTTP handlers
#[derive(Debug)]
pub struct AppState {
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Shutdown settings reported by /status
    pub cleanup_timeout: Duration,
    pub signals: Vec<&'static str>,
    /// Phase updates from the coordinator running the server
    pub phase_rx: watch::Receiver<Phase>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        port: u16,
        host: String,
        cleanup_timeout: Duration,
        signals: Vec<&'static str>,
        phase_rx: watch::Receiver<Phase>,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            port,
            host,
            cleanup_timeout,
            signals,
            phase_rx,
        }
    }

    /// Latest phase published by the coordinator
    pub fn get_phase(&self) -> Phase {
        *self.phase_rx.borrow()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }
}

fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(7)), "7s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 61)), "3h 1m 1s");
    }

    #[test]
    fn test_phase_follows_channel() {
        let (tx, rx) = watch::channel(Phase::Idle);
        let state = AppState::new(0, "127.0.0.1".to_string(), Duration::from_secs(5), vec![], rx);
        assert_eq!(state.get_phase(), Phase::Idle);

        tx.send_replace(Phase::Running);
        assert_eq!(state.get_phase(), Phase::Running);
    }
}
