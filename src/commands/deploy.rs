// ABOUTME: Deploy command implementation.
// ABOUTME: Forward-deploys a chosen version through the configured backend.

use stable_galaxy::config::Settings;
use stable_galaxy::error::Result;
use stable_galaxy::output::Output;
use stable_galaxy::strategy;
use stable_galaxy::types::Version;

pub async fn deploy(settings: Settings, version: Version, mut output: Output) -> Result<()> {
    output.start_timer();
    let strategy = strategy::from_config(settings.backend()?, settings.dry_run)?;

    output.progress(&format!("Deploying {version} with {}...", strategy.name()));
    strategy.deploy(&version).await?;

    output.success(&format!("Deployed {version}"));
    Ok(())
}
