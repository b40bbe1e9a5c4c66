//! Artifact coordinates used as map keys and as existence-check input.

use std::fmt;

use super::Dependency;

/// `(group, artifact)` identity of a dependency, used to key "who depends on
/// this property".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupArtifact {
    pub group_id: String,
    pub artifact_id: String,
}

impl GroupArtifact {
    #[must_use]
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Pairs this identity with a version for an existence query.
    #[must_use]
    pub fn with_version(&self, version: impl Into<String>) -> GroupArtifactVersion {
        GroupArtifactVersion {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: version.into(),
        }
    }
}

impl From<&Dependency> for GroupArtifact {
    fn from(dependency: &Dependency) -> Self {
        Self::new(&dependency.group_id, &dependency.artifact_id)
    }
}

impl fmt::Display for GroupArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// `(group, artifact, version)` built transiently to query an
/// [`ArtifactResolver`](crate::repository::ArtifactResolver).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupArtifactVersion {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl GroupArtifactVersion {
    /// Repository path segments for the group (`org.example` -> `org/example`).
    #[must_use]
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }
}

impl fmt::Display for GroupArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
