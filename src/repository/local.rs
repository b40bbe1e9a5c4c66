//! Repository laid out on the local file system.

use anyhow::Result;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::ArtifactResolver;
use crate::core::BranchError;
use crate::models::GroupArtifactVersion;

/// A repository directory using the `<group path>/<artifact>/<version>/` layout.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    name: String,
    root: PathBuf,
}

impl LocalRepository {
    #[must_use]
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory that holds the files of `artifact`.
    #[must_use]
    pub fn version_dir(&self, artifact: &GroupArtifactVersion) -> PathBuf {
        self.root.join(artifact.group_path()).join(&artifact.artifact_id).join(&artifact.version)
    }
}

impl ArtifactResolver for LocalRepository {
    fn exists(&self, artifact: &GroupArtifactVersion) -> impl Future<Output = Result<bool>> + Send {
        let dir = self.version_dir(artifact);
        let artifact = artifact.to_string();
        async move {
            match tokio::fs::metadata(&dir).await {
                Ok(metadata) => Ok(metadata.is_dir()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(e) => Err(BranchError::RepositoryUnavailable {
                    artifact,
                    reason: format!("cannot read {}: {e}", dir.display()),
                }
                .into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn gav(version: &str) -> GroupArtifactVersion {
        GroupArtifactVersion {
            group_id: "org.example.libs".to_string(),
            artifact_id: "core".to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn test_version_dir_layout() {
        let repo = LocalRepository::new("local", "/repo");
        assert_eq!(
            repo.version_dir(&gav("1.0-SNAPSHOT")),
            PathBuf::from("/repo/org/example/libs/core/1.0-SNAPSHOT")
        );
    }

    #[tokio::test]
    async fn test_exists_checks_version_directory() {
        let temp = TempDir::new().unwrap();
        let repo = LocalRepository::new("local", temp.path());
        fs::create_dir_all(temp.path().join("org/example/libs/core/1.0-X-SNAPSHOT")).unwrap();
        // A file where the version directory should be does not count.
        fs::write(temp.path().join("org/example/libs/core/2.0-X-SNAPSHOT"), "").unwrap();

        assert!(repo.exists(&gav("1.0-X-SNAPSHOT")).await.unwrap());
        assert!(!repo.exists(&gav("2.0-X-SNAPSHOT")).await.unwrap());
        assert!(!repo.exists(&gav("3.0-X-SNAPSHOT")).await.unwrap());
    }
}
