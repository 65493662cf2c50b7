// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::num::NonZeroU32;
use std::path::PathBuf;

use stable_galaxy::output::OutputMode;
use stable_galaxy::types::Version;

#[derive(Parser)]
#[command(name = "stable-galaxy")]
#[command(about = "Roll a failing deployment back to its last stable version")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (discovered in the current directory otherwise)
    #[arg(short, long, global = true, env = "STABLE_GALAXY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Roll back to the nearest stable version before the current one
    Rollback(RollbackArgs),

    /// Print the version the backend is running
    Current,

    /// Deploy a specific version through the backend
    Deploy {
        /// Version to deploy
        version: Version,
    },

    /// Write a template stable-galaxy.yml configuration file
    Init {
        /// Service name for the template
        #[arg(short, long)]
        service: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct RollbackArgs {
    /// Failing version (read from the backend when omitted)
    #[arg(long)]
    pub from: Option<Version>,

    /// Register a known version (repeatable)
    #[arg(long = "version", value_name = "VERSION")]
    pub versions: Vec<Version>,

    /// Log backend commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Attempts before giving up
    #[arg(long)]
    pub max_attempts: Option<NonZeroU32>,
}
