// ABOUTME: Diagnostics accumulator for non-fatal warnings during a command.
// ABOUTME: Collects warnings that shouldn't fail a rollback but should be shown to users.

/// Collects non-fatal warnings during CLI operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn empty_registry(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::EmptyRegistry,
            message: message.into(),
        }
    }

    pub fn unknown_log_level(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnknownLogLevel,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// No versions were registered, so selection cannot succeed.
    EmptyRegistry,
    /// The configured log level was not recognised and `info` is used.
    UnknownLogLevel,
}
