use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Cancellation token set by termination signals.
///
/// The run loop observes the token at its suspension points and starts the
/// shutdown sequence itself; nothing is cleaned up from signal context.
#[derive(Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Cancel the token on SIGINT or SIGTERM.
    pub fn listen_for_signals(&self) {
        let token = self.token.clone();
        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{signal, SignalKind};
                let mut sigterm = match signal(SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(e) => {
                        error!("Failed to install SIGTERM handler: {}", e);
                        return;
                    }
                };
                let mut sigint = match signal(SignalKind::interrupt()) {
                    Ok(s) => s,
                    Err(e) => {
                        error!("Failed to install SIGINT handler: {}", e);
                        return;
                    }
                };
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                    _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
                }
            }
            #[cfg(not(unix))]
            {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for ctrl-c: {}", e);
                    return;
                }
                info!("Received ctrl-c, shutting down...");
            }
            token.cancel();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_cancels_token() {
        let shutdown = Shutdown::new();
        let token = shutdown.token();
        assert!(!token.is_cancelled());
        shutdown.trigger();
        token.cancelled().await;
    }
}
