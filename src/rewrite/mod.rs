//! Planning and applying the branch rewrite of a reactor.
//!
//! [`BranchRewriter::plan`] turns a reactor, a raw branch name and an
//! [`ArtifactResolver`] into a [`RewritePlan`]: the ordered list of version edits
//! that cut the branch. Three kinds of locations are rewritten, always through the
//! same [`Brancher`] so the whole tree carries one tag:
//!
//! - the project version of every module whose version is a SNAPSHOT
//! - the parent version of every module whose parent version is a SNAPSHOT
//! - every property binding accepted by the resolver
//!
//! Applying the plan goes through [`VersionPatcher`], the seam for anything that
//! can set a version at a location. [`ModuleDescriptor`] implements it in memory; a
//! formatting-preserving descriptor file patcher implements the same trait.

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use crate::core::BranchError;
use crate::models::{ModuleDescriptor, PropertyInstance};
use crate::reactor::Reactor;
use crate::repository::ArtifactResolver;
use crate::resolver::property_changes;
use crate::version::{BranchTag, Brancher, is_snapshot};

/// Where a version lives inside one module descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VersionLocation {
    /// The module's own `version`.
    Project,
    /// The `version` of the module's parent reference.
    Parent,
    /// A property of the module, or of one of its profiles.
    Property {
        #[serde(skip_serializing_if = "Option::is_none")]
        profile: Option<String>,
        name: String,
    },
}

impl fmt::Display for VersionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project => f.write_str("project version"),
            Self::Parent => f.write_str("parent's version"),
            Self::Property {
                profile: None,
                name,
            } => write!(f, "property ${{{name}}}"),
            Self::Property {
                profile: Some(profile),
                name,
            } => write!(f, "property ${{{name}}} (profile {profile})"),
        }
    }
}

/// Sets versions at [`VersionLocation`]s of a single module.
pub trait VersionPatcher {
    /// Replaces the version at `location` with `value`.
    ///
    /// Returns `Ok(false)` when the location does not exist in this module.
    ///
    /// # Errors
    ///
    /// Implementations backed by files fail on I/O errors.
    fn set_version(&mut self, location: &VersionLocation, value: &str) -> Result<bool>;
}

impl VersionPatcher for ModuleDescriptor {
    fn set_version(&mut self, location: &VersionLocation, value: &str) -> Result<bool> {
        let slot = match location {
            VersionLocation::Project => self.version.as_mut(),
            VersionLocation::Parent => self.parent.as_mut().and_then(|parent| parent.version.as_mut()),
            VersionLocation::Property {
                profile,
                name,
            } => {
                let table = match profile {
                    Some(id) => self.profile_mut(id).map(|profile| &mut profile.properties),
                    None => Some(&mut self.properties),
                };
                table.and_then(|table| table.get_mut(name))
            }
        };

        match slot {
            Some(slot) => {
                *slot = value.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// One planned change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEdit {
    pub module: String,
    pub location: VersionLocation,
    pub old_version: String,
    pub new_version: String,
}

impl fmt::Display for VersionEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} from {} to {}",
            self.module, self.location, self.old_version, self.new_version
        )
    }
}

/// Why a rewrite was not planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The branch name was blank or nothing usable survived sanitizing.
    BranchNotSpecified,
    /// The root version already contains the tag.
    AlreadyBranched { version: String },
    /// The root version has no SNAPSHOT marker to insert the tag before.
    NotASnapshot { version: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BranchNotSpecified => f.write_str("the branch was not specified"),
            Self::AlreadyBranched {
                version,
            } => write!(f, "the current version already includes the branch: {version}"),
            Self::NotASnapshot {
                version,
            } => write!(f, "the current version is not a SNAPSHOT: {version}"),
        }
    }
}

/// Result of planning.
#[derive(Debug, Clone)]
pub enum RewriteOutcome {
    Skipped(SkipReason),
    Planned(RewritePlan),
}

/// The edits that cut a branch, in reactor order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewritePlan {
    pub tag: BranchTag,
    pub edits: Vec<VersionEdit>,
}

impl RewritePlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Edits that belong to `module`.
    pub fn edits_for<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a VersionEdit> {
        self.edits.iter().filter(move |edit| edit.module == module)
    }

    /// Applies the edits of `module` through `patcher` and returns how many
    /// locations were updated.
    ///
    /// # Errors
    ///
    /// Propagates patcher failures.
    pub fn apply_module<P: VersionPatcher + ?Sized>(
        &self,
        module: &str,
        patcher: &mut P,
    ) -> Result<usize> {
        let mut updated = 0;
        for edit in self.edits_for(module) {
            if patcher.set_version(&edit.location, &edit.new_version)? {
                info!(">>> Updated {}", edit);
                updated += 1;
            } else {
                warn!("Could not update {} {}: location not found", edit.module, edit.location);
            }
        }
        Ok(updated)
    }

    /// Applies every edit to the in-memory reactor.
    ///
    /// # Errors
    ///
    /// Fails if an edit names a module that is not part of `reactor`.
    pub fn apply(&self, reactor: &mut Reactor) -> Result<usize> {
        if let Some(edit) = self.edits.iter().find(|edit| reactor.module(&edit.module).is_none()) {
            return Err(BranchError::ReactorValidationError {
                reason: format!("module '{}' is not part of the reactor", edit.module),
            }
            .into());
        }

        let mut updated = 0;
        for module in &mut reactor.modules {
            let id = module.module_id().to_string();
            updated += self.apply_module(&id, module)?;
        }
        Ok(updated)
    }
}

/// Options of a branch rewrite.
#[derive(Debug, Clone)]
pub struct BranchOptions {
    /// Raw branch name, for example `feature/ABC-123-login`.
    pub branch: String,
    /// Put the tag in front of versions instead of before `-SNAPSHOT`.
    pub prepend: bool,
    /// Bindings validated concurrently.
    pub max_parallel: usize,
}

/// Plans the rewrite of a reactor for one branch.
#[derive(Debug, Clone)]
pub struct BranchRewriter {
    options: BranchOptions,
}

impl BranchRewriter {
    #[must_use]
    pub const fn new(options: BranchOptions) -> Self {
        Self {
            options,
        }
    }

    /// Computes the edits for `reactor`, checking branched artifacts with `resolver`.
    ///
    /// # Errors
    ///
    /// - [`BranchError::InheritedProjectVersion`] when the root has no version
    /// - [`BranchError::ReactorValidationError`] for an empty reactor
    /// - any resolver failure
    pub async fn plan<R: ArtifactResolver>(
        &self,
        reactor: &Reactor,
        resolver: &R,
    ) -> Result<RewriteOutcome> {
        let root = reactor.root().ok_or_else(|| BranchError::ReactorValidationError {
            reason: "the reactor has no modules".to_string(),
        })?;
        let root_version =
            root.version.as_deref().ok_or_else(|| BranchError::InheritedProjectVersion {
                module: root.module_id().to_string(),
            })?;

        let Some(tag) = BranchTag::derive(&self.options.branch) else {
            info!("POM re-write aborted; the branch was not specified.");
            return Ok(RewriteOutcome::Skipped(SkipReason::BranchNotSpecified));
        };
        info!(
            "Branch {} was trimmed to {} for use inside the version.",
            self.options.branch, tag
        );

        let brancher = Brancher::new(tag.clone(), self.options.prepend);
        if brancher.branch(root_version) == root_version {
            let reason = if root_version.contains(tag.as_str()) {
                SkipReason::AlreadyBranched {
                    version: root_version.to_string(),
                }
            } else {
                SkipReason::NotASnapshot {
                    version: root_version.to_string(),
                }
            };
            info!("POM re-write aborted; {}", reason);
            return Ok(RewriteOutcome::Skipped(reason));
        }

        let changes =
            property_changes(&reactor.modules, &brancher, resolver, self.options.max_parallel)
                .await?;

        let mut edits = Vec::new();
        for module in &reactor.modules {
            edits.extend(Self::module_edits(module, &brancher, &changes));
        }

        Ok(RewriteOutcome::Planned(RewritePlan {
            tag,
            edits,
        }))
    }

    fn module_edits(
        module: &ModuleDescriptor,
        brancher: &Brancher,
        changes: &std::collections::HashSet<PropertyInstance>,
    ) -> Vec<VersionEdit> {
        let edit = |location: VersionLocation, old: &str| VersionEdit {
            module: module.module_id().to_string(),
            location,
            old_version: old.to_string(),
            new_version: brancher.branch(old),
        };

        let mut edits = Vec::new();
        if let Some(version) = module.version.as_deref().filter(|v| is_snapshot(v)) {
            edits.push(edit(VersionLocation::Project, version));
        }
        if let Some(version) =
            module.parent.as_ref().and_then(|p| p.version.as_deref()).filter(|v| is_snapshot(v))
        {
            edits.push(edit(VersionLocation::Parent, version));
        }

        let mut properties: Vec<&PropertyInstance> =
            changes.iter().filter(|change| change.module == module.module_id()).collect();
        properties.sort_unstable();
        for property in properties {
            edits.push(edit(
                VersionLocation::Property {
                    profile: property.profile.clone(),
                    name: property.name.clone(),
                },
                &property.value,
            ));
        }

        // A version that already carries the tag needs no edit.
        edits.retain(|planned| planned.old_version != planned.new_version);
        edits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dependency, GroupArtifactVersion, Parent, Profile};

    fn options(branch: &str) -> BranchOptions {
        BranchOptions {
            branch: branch.to_string(),
            prepend: false,
            max_parallel: 4,
        }
    }

    fn always(_: &GroupArtifactVersion) -> Result<bool> {
        Ok(true)
    }

    fn reactor() -> Reactor {
        let mut root = ModuleDescriptor::new("app");
        root.group_id = Some("org.example".to_string());
        root.version = Some("1.0-SNAPSHOT".to_string());
        root.properties.insert("core.version".to_string(), "2.0-SNAPSHOT".to_string());
        root.properties.insert("unused.version".to_string(), "3.0-SNAPSHOT".to_string());
        root.dependencies.push(Dependency::new("org.example", "core", "${core.version}"));
        let mut profile = Profile::new("ci");
        profile.properties.insert("core.version".to_string(), "2.1-SNAPSHOT".to_string());
        root.profiles.push(profile);

        let mut child = ModuleDescriptor::new("child");
        child.parent = Some(Parent {
            group_id: "org.example".to_string(),
            artifact_id: "app".to_string(),
            version: Some("1.0-SNAPSHOT".to_string()),
        });

        let mut released = ModuleDescriptor::new("released");
        released.version = Some("4.0".to_string());

        Reactor::new(vec![root, child, released]).unwrap()
    }

    async fn plan_for(reactor: &Reactor, branch: &str) -> RewriteOutcome {
        BranchRewriter::new(options(branch)).plan(reactor, &always).await.unwrap()
    }

    #[tokio::test]
    async fn test_plan_covers_project_parent_and_properties() {
        let reactor = reactor();
        let RewriteOutcome::Planned(plan) = plan_for(&reactor, "feature/ABC-9-thing").await else {
            panic!("expected a plan");
        };

        assert_eq!(plan.tag.as_str(), "ABC-9");
        let rendered: Vec<String> = plan.edits.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "app project version from 1.0-SNAPSHOT to 1.0-ABC-9-SNAPSHOT",
                "app property ${core.version} from 2.0-SNAPSHOT to 2.0-ABC-9-SNAPSHOT",
                "app property ${core.version} (profile ci) from 2.1-SNAPSHOT to 2.1-ABC-9-SNAPSHOT",
                "child parent's version from 1.0-SNAPSHOT to 1.0-ABC-9-SNAPSHOT",
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_updates_reactor() {
        let mut reactor = reactor();
        let RewriteOutcome::Planned(plan) = plan_for(&reactor, "ABC-9").await else {
            panic!("expected a plan");
        };

        assert_eq!(plan.apply(&mut reactor).unwrap(), 4);
        let root = reactor.module("app").unwrap();
        assert_eq!(root.version.as_deref(), Some("1.0-ABC-9-SNAPSHOT"));
        assert_eq!(root.properties["core.version"], "2.0-ABC-9-SNAPSHOT");
        assert_eq!(root.properties["unused.version"], "3.0-SNAPSHOT");
        assert_eq!(root.profile("ci").unwrap().properties["core.version"], "2.1-ABC-9-SNAPSHOT");
        let child = reactor.module("child").unwrap();
        assert_eq!(child.parent.as_ref().unwrap().version.as_deref(), Some("1.0-ABC-9-SNAPSHOT"));
        assert_eq!(reactor.module("released").unwrap().version.as_deref(), Some("4.0"));

        // Planning again on the branched reactor is a no-op.
        assert!(matches!(
            plan_for(&reactor, "ABC-9").await,
            RewriteOutcome::Skipped(SkipReason::AlreadyBranched { .. })
        ));
    }

    #[tokio::test]
    async fn test_skip_reasons() {
        let reactor = reactor();
        assert!(matches!(
            plan_for(&reactor, "  ").await,
            RewriteOutcome::Skipped(SkipReason::BranchNotSpecified)
        ));

        let mut released = reactor.clone();
        released.modules[0].version = Some("1.0".to_string());
        assert!(matches!(
            plan_for(&released, "ABC-9").await,
            RewriteOutcome::Skipped(SkipReason::NotASnapshot { .. })
        ));
    }

    #[tokio::test]
    async fn test_inherited_root_version_is_an_error() {
        let mut reactor = reactor();
        reactor.modules[0].version = None;

        let error =
            BranchRewriter::new(options("ABC-9")).plan(&reactor, &always).await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<BranchError>(),
            Some(BranchError::InheritedProjectVersion { .. })
        ));
    }

    #[tokio::test]
    async fn test_prepend_mode() {
        let reactor = reactor();
        let rewriter = BranchRewriter::new(BranchOptions {
            prepend: true,
            ..options("ABC-9")
        });
        let RewriteOutcome::Planned(plan) = rewriter.plan(&reactor, &always).await.unwrap() else {
            panic!("expected a plan");
        };
        assert_eq!(plan.edits[0].new_version, "ABC-9-1.0-SNAPSHOT");
    }

    #[test]
    fn test_patcher_reports_missing_locations() {
        let mut module = ModuleDescriptor::new("m");
        assert!(!module.set_version(&VersionLocation::Project, "1").unwrap());
        assert!(!module.set_version(&VersionLocation::Parent, "1").unwrap());
        let missing = VersionLocation::Property {
            profile: Some("nope".to_string()),
            name: "x".to_string(),
        };
        assert!(!module.set_version(&missing, "1").unwrap());

        module.properties.insert("x".to_string(), "0".to_string());
        let present = VersionLocation::Property {
            profile: None,
            name: "x".to_string(),
        };
        assert!(module.set_version(&present, "1").unwrap());
        assert_eq!(module.properties["x"], "1");
    }

    #[test]
    fn test_apply_rejects_unknown_module() {
        let mut reactor = reactor();
        let plan = RewritePlan {
            tag: BranchTag::derive("ABC-9").unwrap(),
            edits: vec![VersionEdit {
                module: "ghost".to_string(),
                location: VersionLocation::Project,
                old_version: "1.0-SNAPSHOT".to_string(),
                new_version: "1.0-ABC-9-SNAPSHOT".to_string(),
            }],
        };
        assert!(plan.apply(&mut reactor).is_err());
    }
}
