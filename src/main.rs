// ABOUTME: Entry point for the stable-galaxy CLI application.
// ABOUTME: Loads settings, initialises logging, and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use stable_galaxy::config::{self, Settings};
use stable_galaxy::error::Result;
use stable_galaxy::logging;
use stable_galaxy::output::Output;
use std::env;
use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mode = cli.output_mode();

    if let Err(e) = run(cli).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = env::current_dir()?;
    let output = Output::new(cli.output_mode());
    let Cli {
        verbose,
        config: config_path,
        command,
        ..
    } = cli;
    let load = || prepare(config_path.as_deref(), &cwd, verbose);

    match command {
        Commands::Init { service, force } => {
            let path = config::init_config(&cwd, service.as_deref(), force)?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::Rollback(args) => commands::rollback(load()?, args, &cwd, output).await,
        Commands::Current => commands::current(load()?, output).await,
        Commands::Deploy { version } => commands::deploy(load()?, version, output).await,
    }
}

/// File settings (explicit path or discovered) with the environment
/// overlaid, and the global subscriber installed from them.
fn prepare(path: Option<&Path>, cwd: &Path, verbose: bool) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::load(path)?,
        None => Settings::discover_or_default(cwd)?,
    };
    settings.apply_env()?;
    logging::init(&settings.logging, verbose)?;
    Ok(settings)
}
