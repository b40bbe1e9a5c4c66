//! Artifact existence checks against build repositories.
//!
//! The resolver only needs one capability from the outside world: "does this
//! `group:artifact:version` exist?". [`ArtifactResolver`] is that seam. The answer
//! has three outcomes, and the distinction is load-bearing:
//!
//! - `Ok(true)`: the artifact exists
//! - `Ok(false)`: the artifact does not exist; the property is left alone
//! - `Err(_)`: the lookup could not be performed; the rewrite aborts
//!
//! Implementations:
//! - [`RemoteRepository`]: HTTP repository, consulted through artifact metadata
//! - [`LocalRepository`]: repository layout on the local file system
//! - [`RepositorySet`]: ordered list of the above, first positive answer wins
//! - any `Fn(&GroupArtifactVersion) -> anyhow::Result<bool> + Sync`, for tests and
//!   embedding
//!
//! Resolvers must be safe to call concurrently; the validation gate checks many
//! bindings at the same time.

pub mod local;
pub mod remote;

pub use local::LocalRepository;
pub use remote::RemoteRepository;

use anyhow::Result;
use std::future::Future;
use tracing::{debug, info};

use crate::models::GroupArtifactVersion;

/// Answers whether an artifact version exists.
pub trait ArtifactResolver: Sync {
    /// Looks up `artifact`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the lookup itself failed; a missing artifact is
    /// `Ok(false)`.
    fn exists(&self, artifact: &GroupArtifactVersion) -> impl Future<Output = Result<bool>> + Send;
}

impl<F> ArtifactResolver for F
where
    F: Fn(&GroupArtifactVersion) -> Result<bool> + Sync,
{
    fn exists(&self, artifact: &GroupArtifactVersion) -> impl Future<Output = Result<bool>> + Send {
        std::future::ready(self(artifact))
    }
}

/// A single configured repository.
#[derive(Debug, Clone)]
pub enum Repository {
    Remote(RemoteRepository),
    Local(LocalRepository),
}

impl Repository {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Remote(remote) => remote.name(),
            Self::Local(local) => local.name(),
        }
    }

    async fn lookup(&self, artifact: &GroupArtifactVersion) -> Result<bool> {
        match self {
            Self::Remote(remote) => remote.exists(artifact).await,
            Self::Local(local) => local.exists(artifact).await,
        }
    }
}

/// Ordered repositories; an artifact exists if any of them has it.
///
/// Repositories are asked in order and the first positive answer ends the lookup.
/// A failing repository aborts the lookup even if a later one might have answered.
#[derive(Debug, Clone, Default)]
pub struct RepositorySet {
    repositories: Vec<Repository>,
}

impl RepositorySet {
    #[must_use]
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self {
            repositories,
        }
    }

    pub fn push(&mut self, repository: Repository) {
        self.repositories.push(repository);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        self.repositories.iter()
    }
}

impl ArtifactResolver for RepositorySet {
    fn exists(&self, artifact: &GroupArtifactVersion) -> impl Future<Output = Result<bool>> + Send {
        async move {
            for repository in &self.repositories {
                if repository.lookup(artifact).await? {
                    info!("Branched artifact resolved successfully: {} in {}", artifact, repository.name());
                    return Ok(true);
                }
                debug!("{} not found in {}", artifact, repository.name());
            }
            Ok(false)
        }
    }
}
