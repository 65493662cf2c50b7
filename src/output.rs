// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::rollback::RollbackReport;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration_secs(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a non-fatal warning to stderr.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit_err(&JsonEvent {
                event: "warning",
                message,
                duration_secs: None,
            }),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => self.emit(&JsonEvent {
                event: "success",
                message,
                duration_secs: self.duration_secs(),
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => self.emit_err(&JsonEvent {
                event: "error",
                message,
                duration_secs: self.duration_secs(),
            }),
        }
    }

    /// Print the outcome of a completed rollback.
    pub fn report(&self, report: &RollbackReport) {
        match self.mode {
            OutputMode::Json => self.emit(&ReportEvent {
                event: "rollback",
                report,
            }),
            OutputMode::Normal | OutputMode::Quiet => {
                let suffix = if report.dry_run { " [dry run]" } else { "" };
                self.success(&format!(
                    "Rolled back {} from {} to {} in {} attempt(s){suffix}",
                    report.strategy, report.from_version, report.to_version, report.attempts
                ));
            }
        }
    }

    /// Print a single named value, e.g. the live version.
    pub fn value(&self, name: &str, value: &str) {
        match self.mode {
            OutputMode::Normal => println!("{name}: {value}"),
            OutputMode::Quiet => println!("{value}"),
            OutputMode::Json => self.emit(&ValueEvent {
                event: "value",
                name,
                value,
            }),
        }
    }

    fn emit<T: Serialize>(&self, event: &T) {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    }

    fn emit_err<T: Serialize>(&self, event: &T) {
        if let Ok(json) = serde_json::to_string(event) {
            eprintln!("{json}");
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct ReportEvent<'a> {
    event: &'a str,
    #[serde(flatten)]
    report: &'a RollbackReport,
}

#[derive(Serialize)]
struct ValueEvent<'a> {
    event: &'a str,
    name: &'a str,
    value: &'a str,
}
