//! Report the version edits of a branch without writing anything.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;

use super::common::{BranchArgs, OutputFormat, print_edits, print_skipped};
use crate::config::BranchConfig;
use crate::rewrite::RewriteOutcome;

/// Command to show the planned version edits.
#[derive(Args, Debug)]
pub struct PlanCommand {
    #[command(flatten)]
    pub args: BranchArgs,
}

impl PlanCommand {
    /// Plans the rewrite and prints it.
    ///
    /// # Errors
    ///
    /// See [`BranchArgs::plan`].
    pub async fn execute(self, config: BranchConfig) -> Result<()> {
        let (_, outcome) = self.args.plan(config).await?;

        let plan = match outcome {
            RewriteOutcome::Skipped(reason) => return print_skipped(&reason, self.args.format),
            RewriteOutcome::Planned(plan) => plan,
        };

        match self.args.format {
            OutputFormat::Json => {
                let output = json!({
                    "status": "planned",
                    "tag": plan.tag,
                    "edits": plan.edits,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text if plan.is_empty() => {
                println!("{} No SNAPSHOT versions to rewrite for tag {}", "✓".green(), plan.tag);
            }
            OutputFormat::Text => {
                print_edits(&plan);
                println!("{} version(s) to update", plan.edits.len());
            }
        }
        Ok(())
    }
}
