//! Run-until-cancel coordination

use std::{future::Future, panic::AssertUnwindSafe};

use anyhow::anyhow;
use futures::FutureExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{CleanupScope, Outcome, Phase};
use crate::{config::ShutdownConfig, error::ShutdownError, signals::do_after_signal};

/// Drives one run, cancel, cleanup cycle at a time and publishes its phase
#[derive(Debug)]
pub struct Coordinator {
    config: ShutdownConfig,
    phase_tx: watch::Sender<Phase>,
    /// Keep the receiver alive to prevent channel closure
    _phase_rx: watch::Receiver<Phase>,
}

impl Coordinator {
    pub fn new(config: ShutdownConfig) -> Self {
        let (phase_tx, phase_rx) = watch::channel(Phase::new());
        Self {
            config,
            phase_tx,
            _phase_rx: phase_rx,
        }
    }

    pub fn config(&self) -> &ShutdownConfig {
        &self.config
    }

    /// Current phase of the cycle
    pub fn phase(&self) -> Phase {
        *self.phase_tx.borrow()
    }

    /// Subscribe to phase transitions
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase_tx.subscribe()
    }

    fn set_phase(&self, phase: Phase) {
        debug!("Coordinator phase: {}", phase.name());
        self.phase_tx.send_replace(phase);
    }

    /// Run `run` until `token` is cancelled, then run `cleanup` within the
    /// configured timeout.
    ///
    /// A run failure already reported when cancellation is observed wins over
    /// the cleanup result; cleanup is still invoked and its error, if any, is
    /// kept as the suppressed error.
    pub async fn run_until_cancel<R, RFut, RErr, C, CFut, CErr>(
        &self,
        token: CancellationToken,
        run: R,
        cleanup: C,
    ) -> Result<(), ShutdownError>
    where
        R: FnOnce() -> RFut + Send + 'static,
        RFut: Future<Output = Result<(), RErr>> + Send + 'static,
        RErr: Into<anyhow::Error> + Send + 'static,
        C: FnOnce(CleanupScope) -> CFut,
        CFut: Future<Output = Result<(), CErr>>,
        CErr: Into<anyhow::Error>,
    {
        self.set_phase(Phase::Running);

        // Run is polled ahead of the token, so a failure returned in the same
        // poll that cancels the token is always recorded.
        let mut run_fut = Box::pin(
            AssertUnwindSafe(async move {
                let result: anyhow::Result<()> = run().await.map_err(Into::into);
                result
            })
            .catch_unwind(),
        );
        let mut run_outcome: Option<anyhow::Result<()>> = None;
        loop {
            tokio::select! {
                biased;
                result = &mut run_fut, if run_outcome.is_none() => {
                    run_outcome = Some(result.unwrap_or_else(|_| {
                        Err(anyhow!("run operation panicked"))
                    }));
                }
                _ = token.cancelled() => break,
            }
        }
        self.set_phase(Phase::CancelRequested);

        let run_error = match run_outcome {
            Some(Ok(())) => {
                debug!("Run operation had already completed");
                None
            }
            Some(Err(e)) => Some(e),
            None => {
                tokio::spawn(async move {
                    match run_fut.await {
                        Ok(Ok(())) => debug!("Run operation finished after shutdown began"),
                        Ok(Err(e)) => warn!("Run operation failed after shutdown began: {:#}", e),
                        Err(_) => warn!("Run operation panicked after shutdown began"),
                    }
                });
                None
            }
        };

        let (scope, release) = CleanupScope::new(self.config.cleanup_timeout);
        self.set_phase(Phase::CleaningUp);
        info!(
            "Running cleanup with a {}ms deadline",
            scope.timeout().as_millis()
        );
        let cleanup_result: anyhow::Result<()> = cleanup(scope).await.map_err(Into::into);
        drop(release);

        let result = match (run_error, cleanup_result) {
            (Some(source), Ok(())) => Err(ShutdownError::Run {
                source,
                suppressed: None,
            }),
            (Some(source), Err(cleanup_error)) => {
                warn!(
                    "Cleanup failed after run error, keeping run error: {:#}",
                    cleanup_error
                );
                Err(ShutdownError::Run {
                    source,
                    suppressed: Some(cleanup_error),
                })
            }
            (None, Err(source)) => Err(ShutdownError::Cleanup { source }),
            (None, Ok(())) => Ok(()),
        };

        self.set_phase(Phase::Done(Outcome::from_result(&result)));
        result
    }

    /// Run until one of the configured signals arrives, then clean up.
    pub async fn run_until_shutdown<R, RFut, RErr, C, CFut, CErr>(
        &self,
        run: R,
        cleanup: C,
    ) -> Result<(), ShutdownError>
    where
        R: FnOnce() -> RFut + Send + 'static,
        RFut: Future<Output = Result<(), RErr>> + Send + 'static,
        RErr: Into<anyhow::Error> + Send + 'static,
        C: FnOnce(CleanupScope) -> CFut,
        CFut: Future<Output = Result<(), CErr>>,
        CErr: Into<anyhow::Error>,
    {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let watch = do_after_signal(move |_| trigger.cancel(), &self.config.signals)?;

        let result = self.run_until_cancel(token, run, cleanup).await;
        watch.stop();
        result
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(ShutdownConfig::default())
    }
}

/// Run `run` until `token` is cancelled, then `cleanup`, using the default
/// five second cleanup timeout.
pub async fn run_until_cancel<R, RFut, RErr, C, CFut, CErr>(
    token: CancellationToken,
    run: R,
    cleanup: C,
) -> Result<(), ShutdownError>
where
    R: FnOnce() -> RFut + Send + 'static,
    RFut: Future<Output = Result<(), RErr>> + Send + 'static,
    RErr: Into<anyhow::Error> + Send + 'static,
    C: FnOnce(CleanupScope) -> CFut,
    CFut: Future<Output = Result<(), CErr>>,
    CErr: Into<anyhow::Error>,
{
    Coordinator::default()
        .run_until_cancel(token, run, cleanup)
        .await
}

/// Run `run` (typically a server) until SIGINT, SIGQUIT, SIGTERM or SIGHUP is
/// received, then `cleanup`.
pub async fn run_until_shutdown<R, RFut, RErr, C, CFut, CErr>(
    run: R,
    cleanup: C,
) -> Result<(), ShutdownError>
where
    R: FnOnce() -> RFut + Send + 'static,
    RFut: Future<Output = Result<(), RErr>> + Send + 'static,
    RErr: Into<anyhow::Error> + Send + 'static,
    C: FnOnce(CleanupScope) -> CFut,
    CFut: Future<Output = Result<(), CErr>>,
    CErr: Into<anyhow::Error>,
{
    Coordinator::default().run_until_shutdown(run, cleanup).await
}
