//! Print the tag a branch name turns into.

use anyhow::Result;
use clap::Args;

use crate::core::BranchError;
use crate::version::BranchTag;

/// Command to derive a branch tag.
#[derive(Args, Debug)]
pub struct TagCommand {
    /// Branch name, for example `feature/ABC-123-login`
    pub branch: String,
}

impl TagCommand {
    /// Prints the derived tag.
    ///
    /// # Errors
    ///
    /// Fails when nothing usable is left of the branch name.
    pub fn execute(self) -> Result<()> {
        let tag = BranchTag::derive(&self.branch).ok_or_else(|| BranchError::Other {
            message: format!("branch '{}' does not yield a usable tag", self.branch),
        })?;
        println!("{tag}");
        Ok(())
    }
}
