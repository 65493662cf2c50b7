// ABOUTME: Classified error values surfaced by the rollback engine.
// ABOUTME: Every failure carries a kind, a message, an optional cause, and typed metadata.

use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;

use crate::types::Version;

/// Boxed cause wrapped by a [`RollbackError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure category for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// No acceptable target version, or a malformed one.
    Validation,
    /// A hook or the strategy failed to execute.
    Deployment,
    /// Produced by the health monitor.
    HealthCheck,
    /// Invalid engine or backend configuration.
    Configuration,
    /// Backend transport faults.
    Network,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Deployment => "DeploymentError",
            ErrorKind::HealthCheck => "HealthCheckError",
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Network => "NetworkError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context attached to an error at the point of failure.
///
/// Every field is optional except `rollback_applied`, which is true only when
/// the strategy succeeded and a later step (the post-rollback hook) failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_version: Option<Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_version: Option<Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    pub rollback_applied: bool,
}

impl ErrorMetadata {
    pub fn transition(from: &Version, to: &Version, strategy: &str) -> Self {
        Self {
            from_version: Some(from.clone()),
            to_version: Some(to.clone()),
            strategy: Some(strategy.to_string()),
            ..Default::default()
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    pub fn applied(mut self) -> Self {
        self.rollback_applied = true;
        self
    }
}

/// A classified rollback failure.
///
/// Built once with the `with_*` combinators and then only read.
#[derive(Debug)]
pub struct RollbackError {
    kind: ErrorKind,
    message: String,
    source: Option<BoxError>,
    metadata: ErrorMetadata,
}

impl RollbackError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            metadata: ErrorMetadata::default(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn deployment(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Deployment, message)
    }

    pub fn health_check(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HealthCheck, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_metadata(mut self, metadata: ErrorMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn metadata(&self) -> &ErrorMetadata {
        &self.metadata
    }

    /// Direct cause, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

impl fmt::Display for RollbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(cause) => write!(f, "{}: {} (cause: {})", self.kind, self.message, cause),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl StdError for RollbackError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}
