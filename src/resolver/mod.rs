//! Property resolution: which SNAPSHOT properties of a reactor may be branched.
//!
//! The resolver answers one question for the rewrite step: given all module
//! descriptors, which `(module, profile, property)` bindings carry a SNAPSHOT value
//! that dependencies consume, and can every one of those dependencies be found in the
//! repository under the branched version?
//!
//! # Pipeline
//!
//! 1. [`reference`] parses `${name}` values and walks alias chains.
//! 2. [`collector`] builds the binding, alias and dependent maps from all modules.
//! 3. [`validation`] filters the bindings through an
//!    [`ArtifactResolver`](crate::repository::ArtifactResolver), concurrently.
//!
//! [`property_changes`] runs all three.
//!
//! # Example
//!
//! ```rust,no_run
//! use pombranch::models::{Dependency, GroupArtifactVersion, ModuleDescriptor};
//! use pombranch::resolver::property_changes;
//! use pombranch::version::{BranchTag, Brancher};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut root = ModuleDescriptor::new("app");
//! root.properties.insert("core.version".into(), "2.0-SNAPSHOT".into());
//! root.dependencies.push(Dependency::new("org.example", "core", "${core.version}"));
//!
//! let brancher = Brancher::new(BranchTag::derive("feature/ABC-7").unwrap(), false);
//! let exists = |_: &GroupArtifactVersion| -> anyhow::Result<bool> { Ok(true) };
//!
//! let changes = property_changes(&[root], &brancher, &exists, 8).await?;
//! assert_eq!(changes.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod reference;
pub mod validation;

pub use collector::CollectedProperties;
pub use reference::{parse_reference, resolve_reference};
pub use validation::ValidationGate;

use anyhow::Result;
use std::collections::HashSet;
use tracing::info;

use crate::models::{ModuleDescriptor, PropertyInstance};
use crate::repository::ArtifactResolver;
use crate::version::Brancher;

/// Collects properties from `modules` and returns the bindings that are safe to
/// rewrite with `brancher`.
///
/// At most `max_parallel` bindings are validated at the same time.
///
/// # Errors
///
/// Fails when the resolver cannot perform a lookup. A lookup answering "not found"
/// is not an error; it only excludes the binding.
pub async fn property_changes<R: ArtifactResolver>(
    modules: &[ModuleDescriptor],
    brancher: &Brancher,
    resolver: &R,
    max_parallel: usize,
) -> Result<HashSet<PropertyInstance>> {
    let collected = CollectedProperties::collect(modules);
    let accepted =
        ValidationGate::new(&collected, brancher, resolver, max_parallel).accepted_bindings().await?;
    info!(
        "{} of {} SNAPSHOT properties will be branched",
        accepted.len(),
        collected.bindings().count()
    );
    Ok(accepted)
}
