// ABOUTME: Tracing subscriber setup for the binary.
// ABOUTME: Text or JSON lines to stderr or a log file, filtered by level or RUST_LOG.

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Error, Result};

/// Install the global subscriber. `RUST_LOG` wins over the configured level,
/// and `verbose` forces debug.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        "debug"
    } else {
        config.effective_level()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match (config.format, &config.file) {
        (LogFormat::Text, None) => builder.with_writer(std::io::stderr).try_init(),
        (LogFormat::Json, None) => builder.json().with_writer(std::io::stderr).try_init(),
        (format, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            match format {
                LogFormat::Text => builder.try_init(),
                LogFormat::Json => builder.json().try_init(),
            }
        }
    };

    installed.map_err(|e| Error::InvalidConfig(format!("failed to initialise logging: {e}")))
}
