//! One-shot signal watcher

use futures::stream::StreamExt;
use signal_hook_tokio::{Handle, Signals};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::set::{signal_name, SignalSet};
use crate::error::ShutdownError;

/// Handle to a running watch started by [`do_after_signal`]
#[derive(Debug)]
pub struct SignalWatch {
    handle: Handle,
    task: JoinHandle<Option<i32>>,
}

impl SignalWatch {
    /// Stop watching without invoking the callback.
    ///
    /// Has no effect once a signal was delivered.
    pub fn stop(&self) {
        self.handle.close();
    }

    /// Whether the watcher task has ended
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the watch to end, returning the delivered signal if any
    pub async fn wait(self) -> Option<i32> {
        match self.task.await {
            Ok(received) => received,
            Err(e) => {
                error!("Signal watcher task failed: {}", e);
                None
            }
        }
    }
}

/// Run `on_signal` once any signal of `signals` is received.
///
/// Registration happens before this returns; waiting happens on a spawned
/// task, so this must be called from within a tokio runtime. The watch ends
/// after the first delivery and later signals are not observed by it.
pub fn do_after_signal<F>(on_signal: F, signals: &SignalSet) -> Result<SignalWatch, ShutdownError>
where
    F: FnOnce(i32) + Send + 'static,
{
    let mut stream = Signals::new(signals.as_slice())?;
    let handle = stream.handle();
    debug!("Watching signals: {:?}", signals.names());

    let task_handle = handle.clone();
    let task = tokio::spawn(async move {
        let received = stream.next().await;
        task_handle.close();

        match received {
            Some(signal) => {
                info!("Received signal: {}", signal_name(signal));
                on_signal(signal);
            }
            None => debug!("Signal watch stopped before any delivery"),
        }
        received
    });

    Ok(SignalWatch { handle, task })
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_hook::consts::{SIGURG, SIGUSR1, SIGUSR2, SIGWINCH};
    use signal_hook::low_level::raise;
    use std::io::Write;
    use std::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    };
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    // Keeps an action registered so a raise after the watch closed is never fatal.
    fn keep_alive(signal: i32) {
        signal_hook::flag::register(signal, Arc::new(AtomicBool::new(false))).unwrap();
    }

    #[tokio::test]
    async fn test_callback_receives_delivered_signal() {
        keep_alive(SIGUSR1);
        let set = SignalSet::new(SIGWINCH, [SIGUSR1]);
        let (tx, rx) = tokio::sync::oneshot::channel();

        let watch = do_after_signal(
            move |signal| {
                let _ = tx.send(signal);
            },
            &set,
        )
        .unwrap();

        raise(SIGUSR1).unwrap();
        let got = timeout(Duration::from_secs(5), rx).await.unwrap().unwrap();
        assert_eq!(got, SIGUSR1);
        assert_eq!(watch.wait().await, Some(SIGUSR1));
    }

    #[tokio::test]
    async fn test_second_signal_has_no_effect() {
        keep_alive(SIGUSR2);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let watch = do_after_signal(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            &SignalSet::new(SIGUSR2, []),
        )
        .unwrap();

        raise(SIGUSR2).unwrap();
        let delivered = timeout(Duration::from_secs(5), watch.wait()).await.unwrap();
        assert_eq!(delivered, Some(SIGUSR2));

        raise(SIGUSR2).unwrap();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_skips_callback() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);

        let watch = do_after_signal(
            move |_| flag.store(true, Ordering::SeqCst),
            &SignalSet::new(SIGWINCH, []),
        )
        .unwrap();
        assert!(!watch.is_finished());

        watch.stop();
        let delivered = timeout(Duration::from_secs(5), watch.wait()).await.unwrap();
        assert_eq!(delivered, None);
        assert!(!called.load(Ordering::SeqCst));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_panicking_callback_is_logged() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let watch = do_after_signal(
            |_| panic!("callback failed"),
            &SignalSet::new(SIGURG, []),
        )
        .unwrap();

        raise(SIGURG).unwrap();
        let delivered = timeout(Duration::from_secs(5), watch.wait()).await.unwrap();
        assert_eq!(delivered, None);

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Signal watcher task failed"), "logs: {}", output);
    }
}
