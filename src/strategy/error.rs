// ABOUTME: Strategy error types with SNAFU pattern.
// ABOUTME: Separates transport faults from platform faults for classification.

use snafu::Snafu;
use std::process::ExitStatus;

use crate::rollback::{ErrorKind, RollbackError};

/// Failure reported by a deployment backend.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StrategyError {
    #[snafu(display("failed to run `{program}`: {source}"))]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("`{command}` failed ({status}): {stderr}"))]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[snafu(display("no deployable unit found: {target}"))]
    NotFound { target: String },

    #[snafu(display("could not read version from `{output}`: {reason}"))]
    UnreadableVersion { output: String, reason: String },

    #[snafu(display("invalid backend configuration: {message}"))]
    InvalidConfig { message: String },

    #[snafu(display("transport error: {message}"))]
    Transport { message: String },

    #[snafu(display("{message}"))]
    Platform { message: String },
}

impl StrategyError {
    /// Classification of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrategyError::Spawn { .. } | StrategyError::Transport { .. } => ErrorKind::Network,
            StrategyError::InvalidConfig { .. } => ErrorKind::Configuration,
            StrategyError::NotFound { .. }
            | StrategyError::CommandFailed { .. }
            | StrategyError::UnreadableVersion { .. }
            | StrategyError::Platform { .. } => ErrorKind::Deployment,
        }
    }

    /// Convenience for custom strategies.
    pub fn platform(message: impl Into<String>) -> Self {
        StrategyError::Platform {
            message: message.into(),
        }
    }
}

impl From<StrategyError> for RollbackError {
    fn from(err: StrategyError) -> Self {
        RollbackError::new(err.kind(), "strategy operation failed").with_source(err)
    }
}
