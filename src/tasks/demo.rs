//! Minimal run/cleanup pair writing to stdout

use crate::{config::ShutdownConfig, coordinator::Coordinator};

/// Print `doing something`, wait for a shutdown signal, then print `shutting down`.
///
/// Nothing else is written to stdout.
pub async fn demo_until_shutdown(config: ShutdownConfig) -> anyhow::Result<()> {
    Coordinator::new(config)
        .run_until_shutdown(
            || async {
                println!("doing something");
                Ok::<(), anyhow::Error>(())
            },
            |_scope| async {
                println!("shutting down");
                Ok::<(), anyhow::Error>(())
            },
        )
        .await?;

    Ok(())
}
