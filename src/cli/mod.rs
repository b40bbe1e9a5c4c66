//! Command-line interface for pombranch.
//!
//! # Available Commands
//!
//! - `plan` - Show the version edits that would cut a branch
//! - `apply` - Apply those edits to a reactor snapshot
//! - `tag` - Print the tag derived from a branch name
//!
//! # Global Options
//!
//! All commands support these global options:
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--config` - Path to a custom config file
//! - `--no-color` - Disable colored output
//!
//! # Example
//!
//! ```bash
//! # What would change for this branch?
//! pombranch plan --reactor reactor.json --branch feature/ABC-123-login \
//!     --repository https://nexus.example.com/repository/maven-snapshots
//!
//! # Rewrite the snapshot, in place
//! pombranch apply --reactor reactor.json --branch feature/ABC-123-login
//!
//! # Just the tag
//! pombranch tag feature/ABC-123-login
//! ```

mod apply;
pub mod common;
mod plan;
mod tag;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::BranchConfig;

/// Runtime configuration derived from the global flags.
///
/// Kept apart from [`Cli`] so that `main` can set up logging before the command
/// runs, and tests can run commands without touching global state.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter for the subscriber; `None` disables logging.
    pub log_level: Option<String>,

    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,

    /// Disable ANSI colors.
    pub no_color: bool,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Parser)]
#[command(
    name = "pombranch",
    about = "Give a development branch its own SNAPSHOT artifacts",
    version,
    long_about = "pombranch inserts a tag derived from the branch name into every SNAPSHOT \
                  version of a multi-module build, including version properties whose \
                  branched artifacts are already published."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a custom config file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the version edits that would cut a branch
    Plan(plan::PlanCommand),

    /// Rewrite a reactor snapshot for a branch
    Apply(apply::ApplyCommand),

    /// Print the tag derived from a branch name
    Tag(tag::TagCommand),
}

impl Cli {
    /// Runs the selected command with the configuration of the global flags.
    ///
    /// # Errors
    ///
    /// Propagates the command's failure.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
            no_color: self.no_color,
        }
    }

    /// Runs the selected command with an explicit [`CliConfig`].
    ///
    /// # Errors
    ///
    /// Fails when the configuration cannot be loaded or the command fails.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        if config.no_color {
            colored::control::set_override(false);
        }

        match self.command {
            Commands::Tag(cmd) => cmd.execute(),
            Commands::Plan(cmd) => {
                let settings = BranchConfig::load_with_optional(config.config_path).await?;
                cmd.execute(settings).await
            }
            Commands::Apply(cmd) => {
                let settings = BranchConfig::load_with_optional(config.config_path).await?;
                cmd.execute(settings).await
            }
        }
    }
}
