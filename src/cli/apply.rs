//! Rewrite a reactor snapshot for a branch.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

use super::common::{BranchArgs, OutputFormat, print_edits, print_skipped};
use crate::config::BranchConfig;
use crate::rewrite::RewriteOutcome;

/// Command to apply the planned version edits.
#[derive(Args, Debug)]
pub struct ApplyCommand {
    #[command(flatten)]
    pub args: BranchArgs,

    /// Where to write the rewritten snapshot; defaults to the input file
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ApplyCommand {
    /// Plans the rewrite, applies it and saves the snapshot.
    ///
    /// Nothing is written when the rewrite is skipped.
    ///
    /// # Errors
    ///
    /// Fails when planning fails or the snapshot cannot be written.
    pub async fn execute(self, config: BranchConfig) -> Result<()> {
        let (mut reactor, outcome) = self.args.plan(config).await?;

        let plan = match outcome {
            RewriteOutcome::Skipped(reason) => return print_skipped(&reason, self.args.format),
            RewriteOutcome::Planned(plan) => plan,
        };

        let updated = plan.apply(&mut reactor)?;
        let output = self.output.as_ref().unwrap_or(&self.args.reactor);
        reactor.save(output).await?;
        info!("Wrote {} updated version(s) to {}", updated, output.display());

        match self.args.format {
            OutputFormat::Json => {
                let report = json!({
                    "status": "applied",
                    "tag": plan.tag,
                    "edits": plan.edits,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                print_edits(&plan);
                println!(
                    "{} Updated {} version(s) in {}",
                    "✓".green(),
                    updated,
                    output.display()
                );
            }
        }
        Ok(())
    }
}
