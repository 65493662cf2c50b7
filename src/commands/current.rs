// ABOUTME: Current command implementation.
// ABOUTME: Prints the version the configured backend is running.

use stable_galaxy::config::Settings;
use stable_galaxy::error::Result;
use stable_galaxy::output::Output;
use stable_galaxy::strategy;

pub async fn current(settings: Settings, output: Output) -> Result<()> {
    let strategy = strategy::from_config(settings.backend()?, settings.dry_run)?;
    let version = strategy.current_version().await?;
    output.value("current version", version.as_str());
    Ok(())
}
