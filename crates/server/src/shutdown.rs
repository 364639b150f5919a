//! Graceful shutdown using `CancellationToken`
//!
//! Tokens can be cloned across tasks; cancelling one cancels them all.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Coordinates shutdown of the server and its background tasks.
///
/// ```ignore
/// let shutdown = ShutdownController::with_ctrl_c();
/// let pool = run_until_shutdown(shutdown.token(), connect(..)).await;
/// http_server.run(shutdown.token()).await?;
/// ```
#[derive(Clone)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Controller that cancels itself on Ctrl+C.
    ///
    /// Must be called inside a tokio runtime.
    pub fn with_ctrl_c() -> Self {
        let controller = Self::new();
        let token = controller.token.clone();

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown...");
                    token.cancel();
                }
                Err(e) => {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                }
            }
        });

        controller
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Run `future` unless shutdown comes first.
///
/// Returns `None` when the token was cancelled before the future finished.
pub async fn run_until_shutdown<F, T>(token: CancellationToken, future: F) -> Option<T>
where
    F: std::future::Future<Output = T>,
{
    tokio::select! {
        result = future => Some(result),
        _ = token.cancelled() => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_tokens_share_cancellation() {
        let controller = ShutdownController::new();
        let server_token = controller.token();
        let connect_token = controller.token();

        assert!(!server_token.is_cancelled());

        connect_token.cancel();

        assert!(server_token.is_cancelled());
        assert!(controller.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_run_until_shutdown_after_cancel() {
        let controller = ShutdownController::new();
        controller.token().cancel();

        let result = run_until_shutdown(controller.token(), std::future::pending::<()>()).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_run_until_shutdown() {
        let token = CancellationToken::new();
        assert_eq!(run_until_shutdown(token, async { 42 }).await, Some(42));

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result = run_until_shutdown(token, async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            42
        })
        .await;

        assert_eq!(result, None);
    }
}
