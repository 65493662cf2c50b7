// ABOUTME: Bounded retry loop around a strategy invocation.
// ABOUTME: Fixed backoff between failures, failure hook once on exhaustion or cancel.

use std::future::Future;

use crate::config::RetryPolicy;
use crate::hooks::{HookContext, HookPoint, HookSet};
use crate::types::Version;

use super::cancel::Cancellation;
use super::error::{BoxError, ErrorMetadata, RollbackError};

/// Runs a fallible call up to `policy.max_attempts` times.
pub struct RetryExecutor<'a> {
    policy: &'a RetryPolicy,
    hooks: &'a HookSet,
    cancel: &'a Cancellation,
    dry_run: bool,
}

impl<'a> RetryExecutor<'a> {
    pub fn new(
        policy: &'a RetryPolicy,
        hooks: &'a HookSet,
        cancel: &'a Cancellation,
        dry_run: bool,
    ) -> Self {
        Self {
            policy,
            hooks,
            cancel,
            dry_run,
        }
    }

    /// Invoke `call` until it succeeds, returning the attempt that did.
    ///
    /// Sleeps `policy.backoff` after each failed attempt except the last.
    /// Cancellation is only observed during those sleeps.
    ///
    /// # Errors
    ///
    /// `Deployment` error wrapping the last failure once attempts run out or
    /// the run is cancelled. The on-failure hook has fired by then.
    pub async fn execute<F, Fut, E>(
        &self,
        from: &Version,
        to: &Version,
        strategy: &str,
        mut call: F,
    ) -> Result<u32, RollbackError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Into<BoxError>,
    {
        let max_attempts = self.policy.attempts();
        let mut attempt = 1;

        loop {
            tracing::info!(attempt, max_attempts, "executing rollback attempt");

            let err: BoxError = match call().await {
                Ok(()) => {
                    tracing::info!(attempt, "rollback attempt succeeded");
                    return Ok(attempt);
                }
                Err(e) => e.into(),
            };

            if attempt >= max_attempts {
                tracing::error!(attempt, error = %err, "rollback attempts exhausted");
                let message = format!("rollback failed after {max_attempts} attempts");
                return Err(self.fail(message, attempt, err, from, to, strategy).await);
            }

            tracing::warn!(
                attempt,
                error = %err,
                backoff = ?self.policy.backoff,
                "rollback attempt failed, retrying"
            );

            if !self.backoff().await {
                tracing::warn!(attempt, "rollback cancelled during backoff");
                let message = format!("rollback cancelled after {attempt} attempts");
                return Err(self.fail(message, attempt, err, from, to, strategy).await);
            }

            attempt += 1;
        }
    }

    /// Wait out the backoff. False if cancelled first.
    async fn backoff(&self) -> bool {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => false,
            () = tokio::time::sleep(self.policy.backoff) => true,
        }
    }

    async fn fail(
        &self,
        message: String,
        attempts: u32,
        last: BoxError,
        from: &Version,
        to: &Version,
        strategy: &str,
    ) -> RollbackError {
        let context = HookContext {
            point: HookPoint::OnFailure,
            strategy: strategy.to_string(),
            from_version: from.clone(),
            to_version: Some(to.clone()),
            dry_run: self.dry_run,
            error: Some(last.to_string()),
        };
        if let Some(Err(e)) = self.hooks.run(&context).await {
            tracing::warn!(error = %e, "on-failure hook failed");
        }

        RollbackError::deployment(message)
            .with_source(last)
            .with_metadata(ErrorMetadata::transition(from, to, strategy).with_attempts(attempts))
    }
}
