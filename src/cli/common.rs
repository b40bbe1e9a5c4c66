//! Arguments and output shared by the `plan` and `apply` commands.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;

use crate::config::BranchConfig;
use crate::reactor::Reactor;
use crate::rewrite::{BranchOptions, BranchRewriter, RewriteOutcome, RewritePlan, SkipReason};

/// Output format of the reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Text,
    /// Structured JSON output for automation
    Json,
}

/// What to rewrite, for which branch, and where to look for branched artifacts.
#[derive(Args, Debug, Clone)]
pub struct BranchArgs {
    /// Reactor snapshot (.json, .toml, .yaml or .yml)
    #[arg(long, short = 'r', value_name = "FILE")]
    pub reactor: PathBuf,

    /// Name of the branch, for example `feature/ABC-123-login`
    #[arg(long, short = 'b', value_name = "NAME")]
    pub branch: String,

    /// Put the tag in front of versions instead of before `-SNAPSHOT`
    #[arg(long, overrides_with = "no_prepend")]
    pub prepend: bool,

    /// Put the tag before `-SNAPSHOT` even if the configuration says `prepend = true`
    #[arg(long, overrides_with = "prepend")]
    pub no_prepend: bool,

    /// Remote repository to check branched artifacts against (repeatable)
    #[arg(long = "repository", value_name = "URL")]
    pub repositories: Vec<String>,

    /// Local repository directory to check branched artifacts against
    #[arg(long, value_name = "DIR")]
    pub local_repository: Option<PathBuf>,

    /// Maximum number of properties validated concurrently
    #[arg(long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl BranchArgs {
    /// Layers the command-line flags over the loaded configuration.
    ///
    /// # Errors
    ///
    /// Fails when the merged configuration is invalid.
    pub fn merge_into(&self, mut config: BranchConfig) -> Result<BranchConfig> {
        if self.prepend {
            config.prepend = true;
        } else if self.no_prepend {
            config.prepend = false;
        }
        config.extra_repositories.extend(self.repositories.iter().cloned());
        if let Some(dir) = &self.local_repository {
            config.local_repository = Some(dir.display().to_string());
        }
        if self.max_parallel.is_some() {
            config.max_parallel = self.max_parallel;
        }
        config.validate()?;
        Ok(config)
    }

    /// Loads the reactor and plans the rewrite against the configured repositories.
    ///
    /// # Errors
    ///
    /// Fails when the reactor cannot be loaded, no repository is configured, or a
    /// repository lookup fails.
    pub async fn plan(&self, config: BranchConfig) -> Result<(Reactor, RewriteOutcome)> {
        let config = self.merge_into(config)?;
        let reactor = Reactor::load(&self.reactor).await?;
        let repositories = config.repository_set()?;
        debug!("Checking branched artifacts against {} repositories", repositories.len());

        let rewriter = BranchRewriter::new(BranchOptions {
            branch: self.branch.clone(),
            prepend: config.prepend,
            max_parallel: config.max_parallel(),
        });
        let outcome = rewriter.plan(&reactor, &repositories).await?;
        Ok((reactor, outcome))
    }
}

pub(crate) fn print_skipped(reason: &SkipReason, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{} Nothing to rewrite: {}", "⚠".yellow(), reason),
        OutputFormat::Json => {
            let output = json!({ "status": "skipped", "reason": reason.to_string() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

pub(crate) fn print_edits(plan: &RewritePlan) {
    println!("Branch tag: {}", plan.tag.as_str().bold());
    for edit in &plan.edits {
        println!(
            "  {} {}: {} -> {}",
            edit.module.cyan(),
            edit.location,
            edit.old_version,
            edit.new_version.green()
        );
    }
}
