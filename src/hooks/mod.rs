// ABOUTME: Lifecycle hooks for rollback runs.
// ABOUTME: Pre-rollback, post-rollback, and on-failure callbacks as closures or scripts.

mod script;

pub use script::{HOOKS_DIR, ScriptHook};

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::Version;

/// Hook execution points in the rollback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Before any rollback attempt. Failure aborts the rollback.
    PreRollback,
    /// After a successful rollback. Failure fails the overall result.
    PostRollback,
    /// After all attempts are exhausted. Failure is logged and dropped.
    OnFailure,
}

impl HookPoint {
    pub const ALL: [HookPoint; 3] = [
        HookPoint::PreRollback,
        HookPoint::PostRollback,
        HookPoint::OnFailure,
    ];

    /// Script filename for this point.
    pub fn filename(&self) -> &'static str {
        match self {
            HookPoint::PreRollback => "pre-rollback",
            HookPoint::PostRollback => "post-rollback",
            HookPoint::OnFailure => "on-failure",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.filename())
    }
}

/// Context handed to every hook.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub point: HookPoint,
    pub strategy: String,
    pub from_version: Version,
    pub to_version: Option<Version>,
    pub dry_run: bool,
    /// Rendered failure, set only for `OnFailure`.
    pub error: Option<String>,
}

impl HookContext {
    /// Convert context to environment variables for script hooks.
    pub fn to_env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("GALAXY_HOOK".to_string(), self.point.filename().to_string());
        env.insert("GALAXY_STRATEGY".to_string(), self.strategy.clone());
        env.insert("GALAXY_FROM_VERSION".to_string(), self.from_version.to_string());
        env.insert("GALAXY_DRY_RUN".to_string(), self.dry_run.to_string());
        env.insert(
            "GALAXY_HOST".to_string(),
            gethostname::gethostname().to_string_lossy().into_owned(),
        );
        if let Some(ref to) = self.to_version {
            env.insert("GALAXY_TO_VERSION".to_string(), to.to_string());
        }
        if let Some(ref error) = self.error {
            env.insert("GALAXY_ERROR".to_string(), error.clone());
        }
        env
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to execute hook {path}: {source}")]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{hook} hook exited with code {code:?}: {stderr}")]
    Failed {
        hook: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{0}")]
    Custom(String),
}

impl HookError {
    pub fn custom(message: impl Into<String>) -> Self {
        HookError::Custom(message.into())
    }
}

/// A callback run at a fixed lifecycle point.
#[async_trait]
pub trait Hook: Send + Sync {
    async fn run(&self, context: &HookContext) -> Result<(), HookError>;
}

/// Hook backed by an async closure. Build with [`hook_fn`].
pub struct FnHook<F>(F);

#[async_trait]
impl<F, Fut> Hook for FnHook<F>
where
    F: Fn(HookContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HookError>> + Send,
{
    async fn run(&self, context: &HookContext) -> Result<(), HookError> {
        (self.0)(context.clone()).await
    }
}

/// Wrap an async closure as a shareable hook.
pub fn hook_fn<F, Fut>(f: F) -> Arc<dyn Hook>
where
    F: Fn(HookContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HookError>> + Send + 'static,
{
    Arc::new(FnHook(f))
}

/// The optional hooks of a rollback configuration.
#[derive(Clone, Default)]
pub struct HookSet {
    pub pre_rollback: Option<Arc<dyn Hook>>,
    pub post_rollback: Option<Arc<dyn Hook>>,
    pub on_failure: Option<Arc<dyn Hook>>,
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("pre_rollback", &self.pre_rollback.is_some())
            .field("post_rollback", &self.post_rollback.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

impl HookSet {
    /// Script hooks found in `<project_dir>/.stable-galaxy/hooks`.
    pub fn discover(project_dir: &Path) -> Self {
        Self::from_dir(&project_dir.join(HOOKS_DIR))
    }

    /// Script hooks found directly in `hooks_dir`. Missing scripts stay unset.
    pub fn from_dir(hooks_dir: &Path) -> Self {
        let mut hooks = HookSet::default();
        for point in HookPoint::ALL {
            if let Some(script) = ScriptHook::find(hooks_dir, point) {
                tracing::debug!(
                    hook = %point,
                    path = %script.path().display(),
                    "found hook script"
                );
                hooks.set(point, Arc::new(script));
            }
        }
        hooks
    }

    pub fn get(&self, point: HookPoint) -> Option<&Arc<dyn Hook>> {
        match point {
            HookPoint::PreRollback => self.pre_rollback.as_ref(),
            HookPoint::PostRollback => self.post_rollback.as_ref(),
            HookPoint::OnFailure => self.on_failure.as_ref(),
        }
    }

    pub fn set(&mut self, point: HookPoint, hook: Arc<dyn Hook>) {
        let slot = match point {
            HookPoint::PreRollback => &mut self.pre_rollback,
            HookPoint::PostRollback => &mut self.post_rollback,
            HookPoint::OnFailure => &mut self.on_failure,
        };
        *slot = Some(hook);
    }

    /// Fill unset points from `other`. Hooks already set win.
    pub fn or(mut self, other: HookSet) -> Self {
        self.pre_rollback = self.pre_rollback.or(other.pre_rollback);
        self.post_rollback = self.post_rollback.or(other.post_rollback);
        self.on_failure = self.on_failure.or(other.on_failure);
        self
    }

    /// Run the hook for `context.point` if one is configured.
    ///
    /// Returns None if no hook is set for that point.
    pub async fn run(&self, context: &HookContext) -> Option<Result<(), HookError>> {
        let hook = self.get(context.point)?;
        tracing::debug!(hook = %context.point, "executing hook");
        Some(hook.run(context).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn context(point: HookPoint) -> HookContext {
        HookContext {
            point,
            strategy: "docker".to_string(),
            from_version: Version::new("v1.2.3").unwrap(),
            to_version: Some(Version::new("v1.2.2").unwrap()),
            dry_run: false,
            error: None,
        }
    }

    #[test]
    fn hook_point_filenames() {
        assert_eq!(HookPoint::PreRollback.filename(), "pre-rollback");
        assert_eq!(HookPoint::PostRollback.filename(), "post-rollback");
        assert_eq!(HookPoint::OnFailure.filename(), "on-failure");
    }

    #[test]
    fn hook_context_to_env() {
        let env = context(HookPoint::PreRollback).to_env();
        assert_eq!(env.get("GALAXY_HOOK"), Some(&"pre-rollback".to_string()));
        assert_eq!(env.get("GALAXY_STRATEGY"), Some(&"docker".to_string()));
        assert_eq!(env.get("GALAXY_FROM_VERSION"), Some(&"v1.2.3".to_string()));
        assert_eq!(env.get("GALAXY_TO_VERSION"), Some(&"v1.2.2".to_string()));
        assert_eq!(env.get("GALAXY_DRY_RUN"), Some(&"false".to_string()));
        assert!(env.contains_key("GALAXY_HOST"));
        assert!(!env.contains_key("GALAXY_ERROR"));
    }

    #[test]
    fn hook_context_without_target() {
        let mut ctx = context(HookPoint::OnFailure);
        ctx.to_version = None;
        ctx.error = Some("boom".to_string());

        let env = ctx.to_env();
        assert!(!env.contains_key("GALAXY_TO_VERSION"));
        assert_eq!(env.get("GALAXY_ERROR"), Some(&"boom".to_string()));
    }

    #[tokio::test]
    async fn unset_point_returns_none() {
        let hooks = HookSet::default();
        assert!(hooks.run(&context(HookPoint::PreRollback)).await.is_none());
    }

    #[tokio::test]
    async fn closure_hook_runs_for_its_point_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut hooks = HookSet::default();
        hooks.set(
            HookPoint::PostRollback,
            hook_fn(move |_| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
        );

        assert!(hooks.run(&context(HookPoint::PreRollback)).await.is_none());
        let result = hooks.run(&context(HookPoint::PostRollback)).await;
        assert!(matches!(result, Some(Ok(()))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_hooks_win_over_discovered() {
        let explicit = hook_fn(|_| async { Ok(()) });
        let mut first = HookSet::default();
        first.set(HookPoint::PreRollback, Arc::clone(&explicit));

        let mut second = HookSet::default();
        second.set(HookPoint::PreRollback, hook_fn(|_| async { Ok(()) }));
        second.set(HookPoint::OnFailure, hook_fn(|_| async { Ok(()) }));

        let merged = first.or(second);
        assert!(Arc::ptr_eq(merged.pre_rollback.as_ref().unwrap(), &explicit));
        assert!(merged.on_failure.is_some());
        assert!(merged.post_rollback.is_none());
    }

    #[test]
    fn missing_hooks_dir_yields_empty_set() {
        let hooks = HookSet::from_dir(Path::new("/nonexistent/hooks"));
        assert!(hooks.pre_rollback.is_none());
        assert!(hooks.post_rollback.is_none());
        assert!(hooks.on_failure.is_none());
    }
}
