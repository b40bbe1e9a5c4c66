//! The gate deciding which SNAPSHOT bindings are safe to rewrite.
//!
//! A binding is accepted only when
//! 1. at least one dependency version resolves to its property name, and
//! 2. **every** such dependency exists in the repository under the branched version.
//!
//! A single missing artifact rejects the binding (fail-closed): rewriting the
//! property would otherwise point some dependency at a version nobody has built.
//! A lookup that fails outright is not a "missing" answer; it propagates and
//! aborts the run.
//!
//! Bindings are independent of each other, so they are validated concurrently with
//! `buffer_unordered`; each evaluation only reads the collected maps.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashSet;
use tracing::{debug, info};

use super::collector::CollectedProperties;
use crate::models::{GroupArtifact, PropertyInstance};
use crate::repository::ArtifactResolver;
use crate::version::Brancher;

/// Validates collected bindings against an [`ArtifactResolver`].
pub struct ValidationGate<'a, R> {
    collected: &'a CollectedProperties,
    brancher: &'a Brancher,
    resolver: &'a R,
    max_parallel: usize,
}

impl<'a, R: ArtifactResolver> ValidationGate<'a, R> {
    #[must_use]
    pub fn new(
        collected: &'a CollectedProperties,
        brancher: &'a Brancher,
        resolver: &'a R,
        max_parallel: usize,
    ) -> Self {
        Self {
            collected,
            brancher,
            resolver,
            max_parallel: max_parallel.max(1),
        }
    }

    /// Returns the bindings that may be rewritten.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the resolver; no partial result is
    /// returned in that case.
    pub async fn accepted_bindings(&self) -> Result<HashSet<PropertyInstance>> {
        let accepted: Vec<Option<PropertyInstance>> = stream::iter(self.collected.bindings())
            .map(|binding| async move {
                let keep = self.validate(binding).await?;
                Ok::<_, anyhow::Error>(keep.then(|| binding.clone()))
            })
            .buffer_unordered(self.max_parallel)
            .try_collect()
            .await?;

        Ok(accepted.into_iter().flatten().collect())
    }

    /// Decides a single binding.
    ///
    /// # Errors
    ///
    /// Propagates resolver failures.
    pub async fn validate(&self, binding: &PropertyInstance) -> Result<bool> {
        let Some(dependents) = self.collected.dependents(&binding.name).filter(|d| !d.is_empty())
        else {
            debug!("Skipping {}: no dependency version references it", binding);
            return Ok(false);
        };

        let version = self.brancher.branch(&binding.value);

        // Sorted so that logs and the first failing lookup are deterministic.
        let mut dependents: Vec<&GroupArtifact> = dependents.iter().collect();
        dependents.sort_unstable();

        for artifact in dependents {
            let gav = artifact.with_version(&version);
            let exists = self.resolver.exists(&gav).await.with_context(|| {
                format!("Failed to check {gav} while validating property ${{{}}}", binding.name)
            })?;
            if !exists {
                info!(
                    "Branched artifact not found: {}. Property ${{{}}} in {} will not be updated",
                    gav, binding.name, binding.module
                );
                return Ok(false);
            }
        }

        debug!("Accepted {} -> {}", binding, version);
        Ok(true)
    }
}
