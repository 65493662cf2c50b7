// ABOUTME: Configuration types and parsing for stable-galaxy.yml.
// ABOUTME: YAML settings, environment overlay, and the runtime RollbackConfig.

mod backend;
mod constraints;
mod env;
mod healthcheck;
mod init;
mod logging;
mod notifications;
mod retry;

pub use backend::{BackendConfig, DockerConfig, KubernetesConfig};
pub use constraints::VersionConstraints;
pub use env::EnvOverlay;
pub use healthcheck::HealthCheckPolicy;
pub use init::init_config;
pub use logging::{LOG_LEVELS, LogFormat, LoggingConfig};
pub use notifications::NotificationPolicy;
pub use retry::RetryPolicy;

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use crate::hooks::{Hook, HookPoint, HookSet};
use crate::rollback::OrderingKind;
use crate::types::Version;

pub const CONFIG_FILENAME: &str = "stable-galaxy.yml";
pub const CONFIG_FILENAME_ALT: &str = "stable-galaxy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".stable-galaxy/config.yml";

/// Caller-supplied acceptance test for rollback candidates.
pub type VersionPredicate = Arc<dyn Fn(&Version) -> bool + Send + Sync>;

/// File-level settings as written in `stable-galaxy.yml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: Option<BackendConfig>,

    #[serde(default)]
    pub retry: RetryPolicy,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub ordering: OrderingKind,

    /// Versions registered before every run.
    #[serde(default)]
    pub versions: Vec<Version>,

    /// The failing version, when it should not be read from the backend.
    #[serde(default)]
    pub from_version: Option<Version>,

    #[serde(default)]
    pub constraints: VersionConstraints,

    #[serde(default)]
    pub health_check: HealthCheckPolicy,

    #[serde(default)]
    pub notifications: NotificationPolicy,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Directory holding hook scripts; `.stable-galaxy/hooks` when unset.
    #[serde(default)]
    pub hooks_dir: Option<PathBuf>,
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Discover a file in `dir`, falling back to defaults when none exists.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => {
                tracing::debug!(dir = %dir.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Overlay the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        EnvOverlay::from_process().apply(self)
    }

    /// Reject contradictory settings; record questionable ones in `diag`.
    pub fn validate(&self, diag: &mut Diagnostics) -> Result<()> {
        if self
            .constraints
            .is_inverted(self.ordering.ordering().as_ref())
        {
            return Err(Error::InvalidConfig(
                "constraints.min_version sorts after constraints.max_version".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            diag.warn(Warning::unknown_log_level(format!(
                "unknown log level `{}`, using info",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// The configured backend, or an error naming what is missing.
    pub fn backend(&self) -> Result<&BackendConfig> {
        self.backend.as_ref().ok_or_else(|| {
            Error::InvalidConfig(
                "no backend configured (set `backend` or ROLLBACK_BACKEND)".to_string(),
            )
        })
    }

    pub fn hooks_dir(&self, project_dir: &Path) -> PathBuf {
        match self.hooks_dir {
            Some(ref dir) if dir.is_absolute() => dir.clone(),
            Some(ref dir) => project_dir.join(dir),
            None => project_dir.join(crate::hooks::HOOKS_DIR),
        }
    }

    /// Runtime configuration with script hooks from `project_dir`.
    pub fn rollback_config(&self, project_dir: &Path) -> RollbackConfig {
        let ordering = self.ordering.ordering();
        RollbackConfig {
            retry: self.retry.clone(),
            dry_run: self.dry_run,
            ordering: self.ordering,
            validate_version: self.constraints.predicate(ordering),
            constraints: self.constraints.clone(),
            hooks: HookSet::from_dir(&self.hooks_dir(project_dir)),
            health_check: self.health_check.clone(),
            notifications: self.notifications.clone(),
            logging: self.logging.clone(),
        }
    }
}

/// Everything the rollback engine needs for one service.
///
/// `Default` yields 3 attempts with a 5s backoff, no validator, and no hooks.
#[derive(Clone, Default)]
pub struct RollbackConfig {
    pub retry: RetryPolicy,
    pub dry_run: bool,
    pub ordering: OrderingKind,
    pub validate_version: Option<VersionPredicate>,
    /// Carried for reference; candidates are filtered only by `validate_version`.
    pub constraints: VersionConstraints,
    pub hooks: HookSet,
    pub health_check: HealthCheckPolicy,
    pub notifications: NotificationPolicy,
    pub logging: LoggingConfig,
}

impl fmt::Debug for RollbackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollbackConfig")
            .field("retry", &self.retry)
            .field("dry_run", &self.dry_run)
            .field("ordering", &self.ordering)
            .field("validate_version", &self.validate_version.is_some())
            .field("constraints", &self.constraints)
            .field("hooks", &self.hooks)
            .field("health_check", &self.health_check)
            .field("notifications", &self.notifications)
            .field("logging", &self.logging)
            .finish()
    }
}

impl RollbackConfig {
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_ordering(mut self, ordering: OrderingKind) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Version) -> bool + Send + Sync + 'static,
    {
        self.validate_version = Some(Arc::new(validate));
        self
    }

    pub fn with_hook(mut self, point: HookPoint, hook: Arc<dyn Hook>) -> Self {
        self.hooks.set(point, hook);
        self
    }
}
