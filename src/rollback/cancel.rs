// ABOUTME: Cooperative cancellation token for rollback runs.
// ABOUTME: Observed by the retry executor while it waits out a backoff.

use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable cancel signal. All clones observe the same flag.
#[derive(Debug, Clone)]
pub struct Cancellation {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancellation {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn uncancelled_token_stays_pending() {
        let token = Cancellation::new();
        let waited = tokio::time::timeout(Duration::from_secs(60), token.cancelled()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn cancelled_resolves_after_cancel() {
        let token = Cancellation::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn already_cancelled_resolves_immediately() {
        let token = Cancellation::new();
        token.cancel();
        token.cancelled().await;
    }
}
