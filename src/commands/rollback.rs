// ABOUTME: Rollback command implementation.
// ABOUTME: Registers known versions, resolves the failing one, and runs the orchestrator.

use std::path::Path;
use std::sync::Arc;

use stable_galaxy::config::Settings;
use stable_galaxy::diagnostics::{Diagnostics, Warning};
use stable_galaxy::error::Result;
use stable_galaxy::output::Output;
use stable_galaxy::rollback::{Cancellation, RollbackOrchestrator};
use stable_galaxy::strategy;

use crate::cli::RollbackArgs;

pub async fn rollback(
    mut settings: Settings,
    args: RollbackArgs,
    project_dir: &Path,
    mut output: Output,
) -> Result<()> {
    apply_args(&mut settings, args);

    output.start_timer();
    let mut diag = Diagnostics::default();
    settings.validate(&mut diag)?;

    let strategy = strategy::from_config(settings.backend()?, settings.dry_run)?;
    let mut orchestrator = RollbackOrchestrator::new(
        settings.rollback_config(project_dir),
        Arc::clone(&strategy),
    );
    for version in &settings.versions {
        orchestrator.register_version(version.clone());
    }
    if orchestrator.registry().is_empty() {
        diag.warn(Warning::empty_registry(
            "no versions registered; pass --version or set ROLLBACK_KNOWN_VERSIONS",
        ));
    }

    let current = match settings.from_version {
        Some(ref version) => version.clone(),
        None => {
            output.progress(&format!("Reading live version from {}...", strategy.name()));
            strategy.current_version().await?
        }
    };

    output.progress(&format!(
        "Rolling back {} from {} ({} known version(s))",
        strategy.name(),
        current,
        orchestrator.registry().len()
    ));

    let cancel = Cancellation::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling rollback");
                cancel.cancel();
            }
        })
    };
    let result = orchestrator
        .rollback_with_cancellation(&current, &cancel)
        .await;
    interrupt.abort();

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.report(&result?);
    Ok(())
}

fn apply_args(settings: &mut Settings, args: RollbackArgs) {
    if let Some(from) = args.from {
        settings.from_version = Some(from);
    }
    settings.versions.extend(args.versions);
    if args.dry_run {
        settings.dry_run = true;
    }
    if let Some(max_attempts) = args.max_attempts {
        settings.retry.max_attempts = max_attempts;
    }
}
