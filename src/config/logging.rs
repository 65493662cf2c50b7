// ABOUTME: Logging configuration for the tracing subscriber.
// ABOUTME: Level, output format, and optional log file.

use serde::Deserialize;
use std::path::PathBuf;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// The configured level if recognised, otherwise `info`.
    pub fn effective_level(&self) -> &str {
        let level = self.level.trim();
        LOG_LEVELS
            .iter()
            .find(|known| known.eq_ignore_ascii_case(level))
            .copied()
            .unwrap_or("info")
    }
}
