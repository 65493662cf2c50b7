// ABOUTME: Executable script hooks discovered in the project directory.
// ABOUTME: Runs the script with the hook context exported as GALAXY_* variables.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::{Hook, HookContext, HookError, HookPoint};

/// Hook scripts directory, relative to the project directory.
pub const HOOKS_DIR: &str = ".stable-galaxy/hooks";

/// A hook implemented as an executable file.
#[derive(Debug, Clone)]
pub struct ScriptHook {
    path: PathBuf,
}

impl ScriptHook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The script for `point` in `hooks_dir`, if it exists.
    pub fn find(hooks_dir: &Path, point: HookPoint) -> Option<Self> {
        let path = hooks_dir.join(point.filename());
        path.is_file().then(|| Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Hook for ScriptHook {
    async fn run(&self, context: &HookContext) -> Result<(), HookError> {
        let hook = context.point.filename();
        tracing::info!("Running {} hook: {}", hook, self.path.display());

        let output = Command::new(&self.path)
            .envs(context.to_env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| HookError::Spawn {
                path: self.path.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            tracing::debug!(hook, "{}", line);
        }

        if output.status.success() {
            tracing::info!("{} hook completed successfully", hook);
            Ok(())
        } else {
            tracing::warn!(
                "{} hook failed with exit code {:?}",
                hook,
                output.status.code()
            );
            Err(HookError::Failed {
                hook,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
