//! pombranch - branch-specific SNAPSHOT versions for multi-module builds
//!
//! Development branches of a multi-module build usually publish the same SNAPSHOT
//! versions as the mainline, so their artifacts overwrite each other in the shared
//! repository. pombranch gives a branch its own artifacts by inserting a short tag,
//! derived from the branch name, into every SNAPSHOT version of the tree:
//!
//! ```text
//! feature/ABC-123-login   ->   tag ABC-123
//! 1.0-SNAPSHOT            ->   1.0-ABC-123-SNAPSHOT
//! ```
//!
//! Project and parent versions are always rewritten. A version *property* is only
//! rewritten when every dependency that consumes it can already be found in a
//! repository under the branched version, so that branches never reference
//! artifacts nobody has built.
//!
//! # Core Modules
//!
//! - [`version`] - SNAPSHOT detection, branch tag derivation and the version transform
//! - [`models`] - Module descriptors, coordinates and property bindings
//! - [`reactor`] - Reactor snapshots in JSON, TOML or YAML
//! - [`resolver`] - Property collection, alias resolution and the validation gate
//! - [`repository`] - Artifact existence checks against local and remote repositories
//! - [`rewrite`] - Planning and applying the version edits
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line interface
//! - [`config`] - Global configuration (~/.pombranch/config.toml)
//! - [`constants`] - Timeouts, retry and parallelism defaults
//! - [`core`] - Error types and user-facing error reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use pombranch::reactor::Reactor;
//! use pombranch::repository::{LocalRepository, Repository, RepositorySet};
//! use pombranch::rewrite::{BranchOptions, BranchRewriter, RewriteOutcome};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut reactor = Reactor::load(Path::new("reactor.json")).await?;
//! let repositories = RepositorySet::new(vec![Repository::Local(LocalRepository::new(
//!     "local",
//!     "/home/me/.m2/repository",
//! ))]);
//!
//! let rewriter = BranchRewriter::new(BranchOptions {
//!     branch: "feature/ABC-123-login".to_string(),
//!     prepend: false,
//!     max_parallel: 8,
//! });
//! if let RewriteOutcome::Planned(plan) = rewriter.plan(&reactor, &repositories).await? {
//!     plan.apply(&mut reactor)?;
//!     reactor.save(Path::new("reactor.json")).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod reactor;
pub mod repository;
pub mod resolver;
pub mod rewrite;
pub mod version;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
