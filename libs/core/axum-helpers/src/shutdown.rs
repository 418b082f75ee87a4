use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Process-wide shutdown coordination.
///
/// Wraps the single [`CancellationToken`] created at process start. Every
/// listener holds a clone of the same coordinator, so:
/// - a signal cancels it once and every listener observes it;
/// - a listener that fails on its own can cancel it to wind the rest down;
/// - cancelling an already-cancelled token is a no-op, so shutdown paths are
///   safe to run in any order.
#[derive(Clone, Debug, Default)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown has been initiated.
    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Initiate shutdown. Idempotent.
    pub fn shutdown(&self) {
        if !self.is_shutting_down() {
            info!("Initiating graceful shutdown");
        }
        self.token.cancel();
    }

    /// Wait for shutdown to be initiated by anyone.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Wait for SIGINT or SIGTERM, then cancel the token.
    ///
    /// Returns early, without a signal, when something else cancels the
    /// token first. A signal handler that cannot be installed is logged and
    /// treated as never firing.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
            },
            _ = terminate => {
                info!("Received SIGTERM, initiating graceful shutdown");
            },
            _ = self.token.cancelled() => return,
        }

        self.shutdown();
    }

    /// Run `fut` to completion, or give up once `grace` has elapsed after
    /// shutdown began. Returns `None` when the grace period ran out.
    pub async fn bounded<F>(&self, grace: Duration, fut: F) -> Option<F::Output>
    where
        F: std::future::Future,
    {
        tokio::pin!(fut);

        tokio::select! {
            output = &mut fut => return Some(output),
            _ = self.token.cancelled() => {}
        }

        tokio::time::timeout(grace, fut).await.ok()
    }
}
