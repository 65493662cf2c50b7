// ABOUTME: Application-wide error types for stable-galaxy.
// ABOUTME: Uses thiserror; wraps rollback and strategy failures for the binary.

use std::path::PathBuf;
use thiserror::Error;

use crate::rollback::RollbackError;
use crate::strategy::StrategyError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Rollback(#[from] RollbackError),

    #[error("{0}")]
    Strategy(#[from] StrategyError),
}

pub type Result<T> = std::result::Result<T, Error>;
