//! Shared data models for build modules and their coordinates.
//!
//! A [`ModuleDescriptor`] is the raw, non-interpolated description of one module of a
//! multi-module build: its own coordinates, its parent reference, its property table,
//! its dependency declarations and its profiles. Descriptors are produced by the
//! reactor loader and are read-only for the resolver; only the rewrite step patches
//! them, through the [`VersionPatcher`](crate::rewrite::VersionPatcher) seam.
//!
//! Field names follow build-descriptor naming (`groupId`, `artifactId`,
//! `dependencyManagement`) so a snapshot exported from a build tool deserializes
//! without a mapping layer.
//!
//! # Example
//!
//! ```json
//! {
//!   "groupId": "org.example",
//!   "artifactId": "app",
//!   "version": "1.0-SNAPSHOT",
//!   "properties": { "core.version": "2.3-SNAPSHOT" },
//!   "dependencies": [
//!     { "groupId": "org.example", "artifactId": "core", "version": "${core.version}" }
//!   ],
//!   "profiles": [
//!     { "id": "ci", "properties": { "tools.version": "${core.version}" } }
//!   ]
//! }
//! ```

pub mod coordinates;
pub mod property;

pub use coordinates::{GroupArtifact, GroupArtifactVersion};
pub use property::PropertyInstance;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One module of the build, as declared in its descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    /// Group id; `None` when inherited from the parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    /// Artifact id, which doubles as the module id.
    pub artifact_id: String,

    /// Project version; `None` when inherited from the parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Parent>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependency_management: Vec<Dependency>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<Profile>,
}

impl ModuleDescriptor {
    /// Creates a descriptor with only an artifact id, for builders and tests.
    #[must_use]
    pub fn new(artifact_id: impl Into<String>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            ..Self::default()
        }
    }

    /// The module id used to key property bindings.
    #[must_use]
    pub fn module_id(&self) -> &str {
        &self.artifact_id
    }

    /// Finds a profile by id.
    #[must_use]
    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.id == id)
    }

    /// Mutable lookup of a profile by id.
    pub fn profile_mut(&mut self, id: &str) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|profile| profile.id == id)
    }

    /// Every dependency declaration of the module: top-level dependencies and
    /// dependency management, then the same two sections of each profile.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies
            .iter()
            .chain(self.dependency_management.iter())
            .chain(self.profiles.iter().flat_map(|profile| {
                profile.dependencies.iter().chain(profile.dependency_management.iter())
            }))
    }

    /// Property tables of the module, each paired with its profile id
    /// (`None` for the module's own table).
    pub fn property_tables(
        &self,
    ) -> impl Iterator<Item = (Option<&str>, &BTreeMap<String, String>)> {
        std::iter::once((None, &self.properties)).chain(
            self.profiles.iter().map(|profile| (Some(profile.id.as_str()), &profile.properties)),
        )
    }
}

/// Reference to the parent descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A build profile with its own properties and dependency sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependency_management: Vec<Dependency>,
}

impl Profile {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// A dependency declaration. The version is kept verbatim, so it may be a
/// literal, a `${property}` reference or absent (managed elsewhere).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Dependency {
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: Some(version.into()),
        }
    }
}
