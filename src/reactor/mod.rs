//! Reactor snapshots: the ordered module descriptors of one multi-module build.
//!
//! The first module of a reactor is the root, the one whose version decides the
//! branch; its children follow in any order. Snapshots are read from and written
//! back to JSON, TOML or YAML, picked by file extension:
//!
//! ```toml
//! [[modules]]
//! groupId = "org.example"
//! artifactId = "app"
//! version = "1.0-SNAPSHOT"
//!
//! [modules.properties]
//! "core.version" = "2.3-SNAPSHOT"
//!
//! [[modules.dependencies]]
//! groupId = "org.example"
//! artifactId = "core"
//! version = "${core.version}"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::core::BranchError;
use crate::models::ModuleDescriptor;

/// Serialization format of a reactor snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Toml,
    Yaml,
}

impl SnapshotFormat {
    /// Picks the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`BranchError::UnsupportedReactorFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, BranchError> {
        match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(BranchError::UnsupportedReactorFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// All modules of a build, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactor {
    #[serde(default)]
    pub modules: Vec<ModuleDescriptor>,
}

impl Reactor {
    /// Builds a reactor from modules, validating module ids.
    ///
    /// # Errors
    ///
    /// See [`Reactor::validate`].
    pub fn new(modules: Vec<ModuleDescriptor>) -> Result<Self, BranchError> {
        let reactor = Self {
            modules,
        };
        reactor.validate()?;
        Ok(reactor)
    }

    /// Loads and validates a snapshot file.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable, malformed or invalid.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BranchError::ReactorNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let format = SnapshotFormat::from_path(path)?;
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read reactor snapshot {}", path.display()))?;

        let reactor = Self::parse(&content, format).map_err(|reason| {
            BranchError::ReactorParseError {
                file: path.display().to_string(),
                reason,
            }
        })?;
        reactor.validate()?;
        debug!("Loaded {} modules from {}", reactor.modules.len(), path.display());
        Ok(reactor)
    }

    fn parse(content: &str, format: SnapshotFormat) -> Result<Self, String> {
        match format {
            SnapshotFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            SnapshotFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            SnapshotFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Serializes the reactor in `format`.
    ///
    /// # Errors
    ///
    /// Fails if the serializer rejects the content.
    pub fn render(&self, format: SnapshotFormat) -> Result<String> {
        let content = match format {
            SnapshotFormat::Json => {
                let mut json = serde_json::to_string_pretty(self)?;
                json.push('\n');
                json
            }
            SnapshotFormat::Toml => toml::to_string_pretty(self)?,
            SnapshotFormat::Yaml => serde_yaml::to_string(self)?,
        };
        Ok(content)
    }

    /// Writes the reactor to `path`, in the format of its extension.
    ///
    /// # Errors
    ///
    /// Fails on an unsupported extension or when the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let format = SnapshotFormat::from_path(path)?;
        let content = self.render(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write reactor snapshot {}", path.display()))
    }

    /// Checks that there is at least one module and that module ids are
    /// non-empty and unique.
    ///
    /// # Errors
    ///
    /// Returns [`BranchError::ReactorValidationError`] describing the first problem.
    pub fn validate(&self) -> Result<(), BranchError> {
        if self.modules.is_empty() {
            return Err(BranchError::ReactorValidationError {
                reason: "the reactor has no modules".to_string(),
            });
        }
        let mut seen = HashSet::new();
        for (index, module) in self.modules.iter().enumerate() {
            if module.artifact_id.trim().is_empty() {
                return Err(BranchError::ReactorValidationError {
                    reason: format!("module #{index} has no artifactId"),
                });
            }
            if !seen.insert(module.module_id()) {
                return Err(BranchError::ReactorValidationError {
                    reason: format!("module id '{}' is declared more than once", module.module_id()),
                });
            }
        }
        Ok(())
    }

    /// The root module, whose version decides the branch.
    #[must_use]
    pub fn root(&self) -> Option<&ModuleDescriptor> {
        self.modules.first()
    }

    #[must_use]
    pub fn module(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|module| module.module_id() == id)
    }

    pub fn module_mut(&mut self, id: &str) -> Option<&mut ModuleDescriptor> {
        self.modules.iter_mut().find(|module| module.module_id() == id)
    }
}
