// ABOUTME: Public rollback entry point for one service.
// ABOUTME: Owns the version registry and drives a RollbackRun through its states.

use std::sync::Arc;

use crate::config::RollbackConfig;
use crate::strategy::Strategy;
use crate::types::Version;

use super::cancel::Cancellation;
use super::error::RollbackError;
use super::registry::VersionRegistry;
use super::report::RollbackReport;
use super::run::RollbackRun;
use super::selector::StableVersionSelector;

/// Rolls one service back to its nearest stable version.
///
/// Register known versions with [`register_version`](Self::register_version),
/// then call [`rollback`](Self::rollback) with the failing version.
pub struct RollbackOrchestrator {
    config: RollbackConfig,
    strategy: Arc<dyn Strategy>,
    registry: VersionRegistry,
}

impl RollbackOrchestrator {
    pub fn new(config: RollbackConfig, strategy: Arc<dyn Strategy>) -> Self {
        let registry = VersionRegistry::with_ordering(config.ordering.ordering());
        Self {
            config,
            strategy,
            registry,
        }
    }

    pub fn register_version(&mut self, version: Version) {
        self.registry.register(version);
    }

    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RollbackConfig {
        &self.config
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// The version a rollback from `current` would target.
    pub fn select_previous(&self, current: &Version) -> Result<Version, RollbackError> {
        StableVersionSelector::new(&self.registry, self.config.validate_version.as_ref())
            .select_previous(current)
    }

    /// Roll back from `current` to the nearest stable version.
    pub async fn rollback(&self, current: &Version) -> Result<RollbackReport, RollbackError> {
        self.rollback_with_cancellation(current, &Cancellation::new())
            .await
    }

    /// As [`rollback`](Self::rollback), stopping early if `cancel` fires while
    /// waiting between attempts.
    pub async fn rollback_with_cancellation(
        &self,
        current: &Version,
        cancel: &Cancellation,
    ) -> Result<RollbackReport, RollbackError> {
        tracing::info!(
            current_version = %current,
            strategy = self.strategy.name(),
            dry_run = self.config.dry_run,
            "starting rollback"
        );

        let result = self.drive(current, cancel).await;
        match result {
            Ok(ref report) => tracing::info!(
                from = %report.from_version,
                to = %report.to_version,
                attempts = report.attempts,
                duration_ms = report.duration().num_milliseconds(),
                "rollback completed successfully"
            ),
            Err(ref e) => tracing::error!(error = %e, "rollback failed"),
        }
        result
    }

    async fn drive(
        &self,
        current: &Version,
        cancel: &Cancellation,
    ) -> Result<RollbackReport, RollbackError> {
        let run = RollbackRun::new(
            &self.config,
            &self.registry,
            self.strategy.as_ref(),
            current.clone(),
        );
        let completed = run
            .select()?
            .prepare()
            .await?
            .apply(cancel)
            .await?
            .confirm()
            .await?;
        Ok(completed.finish())
    }
}
