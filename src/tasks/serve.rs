//! Status server run under the coordinator

use std::sync::Arc;
use anyhow::anyhow;
use tokio::{net::TcpListener, sync::oneshot};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    api::create_router,
    config::ShutdownConfig,
    coordinator::Coordinator,
    state::AppState,
};

/// Serve the status API on `address` until a shutdown signal arrives.
///
/// Cleanup stops accepting connections and waits for in-flight requests
/// until the cleanup deadline.
pub async fn serve_until_shutdown(address: &str, config: ShutdownConfig) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config);
    let listener = TcpListener::bind(address).await?;
    let local_addr = listener.local_addr()?;

    let state = Arc::new(AppState::new(
        local_addr.port(),
        local_addr.ip().to_string(),
        coordinator.config().cleanup_timeout,
        coordinator.config().signals.names(),
        coordinator.subscribe(),
    ));
    let app = create_router(state);

    let stop = CancellationToken::new();
    let server_stop = stop.clone();
    let (drained_tx, drained_rx) = oneshot::channel::<()>();

    coordinator
        .run_until_shutdown(
            move || async move {
                info!("Server running on http://{}", local_addr);
                let result = axum::serve(listener, app)
                    .with_graceful_shutdown(async move { server_stop.cancelled().await })
                    .await;
                let _ = drained_tx.send(());
                result
            },
            move |scope| async move {
                info!("Stopping server");
                stop.cancel();
                tokio::select! {
                    _ = drained_rx => {
                        info!("Server shutdown complete");
                        Ok(())
                    }
                    _ = scope.cancelled() => {
                        Err(anyhow!("server did not drain within {}s", scope.timeout().as_secs()))
                    }
                }
            },
        )
        .await?;

    Ok(())
}
