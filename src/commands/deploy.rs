// ABOUTME: Deploy command implementation.
// ABOUTME: Runs the rollout, then keeps the verified server up until interrupted.

use std::io;
use std::path::PathBuf;

use webroll::config::Config;
use webroll::error::{Error, Result};
use webroll::preflight;
use webroll::rollout::{RolloutContext, RolloutResult, run_rollout};

pub async fn deploy(mut config: Config, source: Option<PathBuf>) -> Result<()> {
    if let Some(source) = source {
        config.deploy.source_dir = source;
    }

    preflight::check(&config)?;
    let ctx = RolloutContext::new(config)?;

    match run_rollout(&ctx).await? {
        RolloutResult::Committed(server) => {
            let shutdown = match shutdown_signal() {
                Ok(shutdown) => shutdown,
                Err(e) => {
                    server.stop().await;
                    return Err(Error::from(e));
                }
            };

            tracing::info!("Deployment SUCCESSFUL");
            println!(
                "Serving {} at http://{}/ (press Ctrl-C to stop)",
                ctx.content_root().display(),
                server.local_addr()
            );

            shutdown.await;
            tracing::info!("shutdown signal received");
            server.stop().await;
            Ok(())
        }
        RolloutResult::RolledBack(e) => Err(Error::RolledBack(e)),
    }
}

/// Install the interrupt handlers now; the returned future resolves on
/// SIGINT or SIGTERM.
#[cfg(unix)]
fn shutdown_signal() -> io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => {}
            _ = terminate.recv() => {}
        }
    })
}

/// Resolves on Ctrl-C.
#[cfg(not(unix))]
fn shutdown_signal() -> io::Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        }
    })
}
