use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Manages graceful shutdown via CancellationToken.
/// Listens for SIGTERM/SIGINT and cancels the token.
#[derive(Debug)]
pub struct ShutdownGuard {
    token: CancellationToken,
}

impl ShutdownGuard {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// The cancellation token the loop monitors.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Spawn a background task that listens for OS signals and triggers
    /// cancellation.
    pub fn spawn_signal_listener(&self) {
        let token = self.token.clone();
        tokio::spawn(async move {
            #[cfg(unix)]
            {
                let sigterm = signal::unix::signal(signal::unix::SignalKind::terminate());
                let sigint = signal::unix::signal(signal::unix::SignalKind::interrupt());
                let (mut sigterm, mut sigint) = match (sigterm, sigint) {
                    (Ok(t), Ok(i)) => (t, i),
                    (Err(e), _) | (_, Err(e)) => {
                        tracing::warn!(error = %e, "failed to register signal handlers");
                        return;
                    }
                };
                tokio::select! {
                    _ = sigterm.recv() => tracing::info!("received SIGTERM, initiating shutdown"),
                    _ = sigint.recv() => tracing::info!("received SIGINT, initiating shutdown"),
                }
            }
            #[cfg(not(unix))]
            {
                let _ = signal::ctrl_c().await;
                tracing::info!("received Ctrl+C, initiating shutdown");
            }
            token.cancel();
        });
    }
}

impl Default for ShutdownGuard {
    fn default() -> Self {
        Self::new()
    }
}
