// ABOUTME: Platform CLI invocations used by the command-driven backends.
// ABOUTME: Builds argument lists as plain data and runs them with tokio::process.

use snafu::{ResultExt, ensure};
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;

use super::error::{CommandFailedSnafu, SpawnSnafu, StrategyError};

/// A program plus arguments, built before it is run so it can be inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Run to completion and return trimmed stdout.
    ///
    /// # Errors
    ///
    /// `Spawn` if the program cannot be started, `CommandFailed` on a
    /// non-zero exit.
    pub async fn output(&self) -> Result<String, StrategyError> {
        tracing::debug!(command = %self, "running command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
            .context(SpawnSnafu {
                program: self.program.clone(),
            })?;

        ensure!(
            output.status.success(),
            CommandFailedSnafu {
                command: self.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
        );

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run a mutating command, or only log it when `dry_run` is set.
    pub async fn execute(&self, dry_run: bool) -> Result<(), StrategyError> {
        if dry_run {
            tracing::info!(command = %self, "dry run: skipping command");
            return Ok(());
        }
        self.output().await.map(|_| ())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
