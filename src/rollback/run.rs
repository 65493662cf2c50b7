// ABOUTME: State transitions for a single rollback run.
// ABOUTME: Each method consumes the run and returns the next state on success.

use chrono::{DateTime, Utc};

use crate::config::RollbackConfig;
use crate::hooks::{HookContext, HookPoint};
use crate::strategy::Strategy;
use crate::types::Version;

use super::cancel::Cancellation;
use super::error::{ErrorMetadata, RollbackError};
use super::registry::VersionRegistry;
use super::report::RollbackReport;
use super::retry::RetryExecutor;
use super::selector::StableVersionSelector;
use super::state::{Applied, Completed, Prepared, Requested, Selected};

/// One rollback away from `from`, advanced state by state.
pub struct RollbackRun<'a, S> {
    config: &'a RollbackConfig,
    registry: &'a VersionRegistry,
    strategy: &'a dyn Strategy,
    from: Version,
    started_at: DateTime<Utc>,
    state: S,
}

impl<'a, S> RollbackRun<'a, S> {
    fn advance<T>(self, state: T) -> RollbackRun<'a, T> {
        RollbackRun {
            config: self.config,
            registry: self.registry,
            strategy: self.strategy,
            from: self.from,
            started_at: self.started_at,
            state,
        }
    }

    pub fn from_version(&self) -> &Version {
        &self.from
    }

    fn hook_context(&self, point: HookPoint, to: &Version) -> HookContext {
        HookContext {
            point,
            strategy: self.strategy.name().to_string(),
            from_version: self.from.clone(),
            to_version: Some(to.clone()),
            dry_run: self.config.dry_run,
            error: None,
        }
    }

    fn metadata(&self, to: &Version) -> ErrorMetadata {
        ErrorMetadata::transition(&self.from, to, self.strategy.name())
    }
}

// =============================================================================
// Requested -> Selected
// =============================================================================

impl<'a> RollbackRun<'a, Requested> {
    pub fn new(
        config: &'a RollbackConfig,
        registry: &'a VersionRegistry,
        strategy: &'a dyn Strategy,
        from: Version,
    ) -> Self {
        Self {
            config,
            registry,
            strategy,
            from,
            started_at: Utc::now(),
            state: Requested,
        }
    }

    /// Pick the rollback target. No hook runs if this fails.
    pub fn select(self) -> Result<RollbackRun<'a, Selected>, RollbackError> {
        let selector =
            StableVersionSelector::new(self.registry, self.config.validate_version.as_ref());
        let target = selector.select_previous(&self.from).map_err(|e| {
            RollbackError::validation("failed to find stable version").with_source(e)
        })?;

        tracing::info!(from = %self.from, to = %target, "selected rollback target");
        Ok(self.advance(Selected { target }))
    }
}

// =============================================================================
// Selected -> Prepared
// =============================================================================

impl<'a> RollbackRun<'a, Selected> {
    pub fn target(&self) -> &Version {
        &self.state.target
    }

    /// Run the pre-rollback hook. On failure the strategy is never invoked.
    pub async fn prepare(self) -> Result<RollbackRun<'a, Prepared>, RollbackError> {
        let context = self.hook_context(HookPoint::PreRollback, &self.state.target);
        if let Some(Err(e)) = self.config.hooks.run(&context).await {
            return Err(RollbackError::deployment("pre-rollback hook failed")
                .with_source(e)
                .with_metadata(self.metadata(&self.state.target)));
        }

        let target = self.state.target.clone();
        Ok(self.advance(Prepared { target }))
    }
}

// =============================================================================
// Prepared -> Applied
// =============================================================================

impl<'a> RollbackRun<'a, Prepared> {
    /// Invoke the strategy under the retry policy.
    pub async fn apply(
        self,
        cancel: &Cancellation,
    ) -> Result<RollbackRun<'a, Applied>, RollbackError> {
        let executor = RetryExecutor::new(
            &self.config.retry,
            &self.config.hooks,
            cancel,
            self.config.dry_run,
        );
        let strategy = self.strategy;
        let (from, to) = (&self.from, &self.state.target);
        let attempts = executor
            .execute(from, to, strategy.name(), || strategy.rollback(from, to))
            .await?;

        let target = self.state.target.clone();
        Ok(self.advance(Applied { target, attempts }))
    }
}

// =============================================================================
// Applied -> Completed
// =============================================================================

impl<'a> RollbackRun<'a, Applied> {
    /// Run the post-rollback hook.
    ///
    /// The platform has already moved at this point, so a failure carries
    /// `rollback_applied` in its metadata.
    pub async fn confirm(self) -> Result<RollbackRun<'a, Completed>, RollbackError> {
        let context = self.hook_context(HookPoint::PostRollback, &self.state.target);
        if let Some(Err(e)) = self.config.hooks.run(&context).await {
            return Err(RollbackError::deployment("post-rollback hook failed")
                .with_source(e)
                .with_metadata(
                    self.metadata(&self.state.target)
                        .with_attempts(self.state.attempts)
                        .applied(),
                ));
        }

        let Applied { target, attempts } = self.state.clone();
        Ok(self.advance(Completed { target, attempts }))
    }
}

// =============================================================================
// Completed
// =============================================================================

impl RollbackRun<'_, Completed> {
    pub fn finish(self) -> RollbackReport {
        RollbackReport {
            from_version: self.from,
            to_version: self.state.target,
            strategy: self.strategy.name().to_string(),
            attempts: self.state.attempts,
            dry_run: self.config.dry_run,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
