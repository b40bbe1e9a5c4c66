//! Global configuration for pombranch.
//!
//! Repository locations and rewrite defaults are kept in a user-wide TOML file so
//! they do not have to be repeated on every invocation, and so that credentials
//! embedded in repository URLs stay out of the project tree.
//!
//! # Configuration File Location
//!
//! - **Unix/macOS**: `~/.pombranch/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\pombranch\config.toml`
//!
//! The location can be overridden with the `POMBRANCH_CONFIG` environment variable
//! or the `--config` flag. A missing file yields the defaults.
//!
//! # File Format
//!
//! ```toml
//! # Local repository, consulted before the remote ones
//! local_repository = "~/.m2/repository"
//!
//! prepend = false
//! max_parallel = 16
//! request_timeout_secs = 30
//!
//! # Remote repositories, consulted in name order
//! [repositories]
//! central = "https://repo.maven.apache.org/maven2"
//! snapshots = "https://nexus.example.com/repository/maven-snapshots"
//! ```
//!
//! Command-line flags take precedence over every value of this file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::constants::{CONFIG_ENV_VAR, DEFAULT_REQUEST_TIMEOUT, default_max_parallel};
use crate::core::BranchError;
use crate::repository::{LocalRepository, RemoteRepository, Repository, RepositorySet};

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

/// User-wide settings of the branch rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    /// Local repository directory; `~` and environment variables are expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_repository: Option<String>,

    /// Put the branch tag in front of versions instead of before `-SNAPSHOT`.
    pub prepend: bool,

    /// Bindings validated concurrently; defaults to max(10, 2 × CPU cores).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,

    /// Timeout of one repository request, in seconds.
    pub request_timeout_secs: u64,

    /// Remote repositories by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub repositories: BTreeMap<String, String>,

    /// Remote repositories given for a single run, in the order they were given.
    #[serde(skip)]
    pub extra_repositories: Vec<String>,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            local_repository: None,
            prepend: false,
            max_parallel: None,
            request_timeout_secs: default_request_timeout_secs(),
            repositories: BTreeMap::new(),
            extra_repositories: Vec::new(),
        }
    }
}

impl BranchConfig {
    /// Loads the configuration from the default location, or the defaults if there
    /// is no file.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Loads the configuration from `path` when given, otherwise from the location
    /// picked by [`BranchConfig::config_path`].
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::config_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads the configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid TOML, or holds invalid values.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Writes the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails if the directory or the file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// The platform default location of the configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the home (or local data) directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("pombranch")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".pombranch")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// The configuration file to use: `POMBRANCH_CONFIG` when set, otherwise
    /// [`BranchConfig::default_path`].
    ///
    /// # Errors
    ///
    /// See [`BranchConfig::default_path`].
    pub fn config_path() -> Result<PathBuf> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
            _ => Self::default_path(),
        }
    }

    /// Rejects values that cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`BranchError::ConfigError`] for a zero parallelism or timeout, or an
    /// empty repository URL.
    pub fn validate(&self) -> Result<(), BranchError> {
        if self.max_parallel == Some(0) {
            return Err(BranchError::ConfigError {
                message: "max_parallel must be at least 1".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(BranchError::ConfigError {
                message: "request_timeout_secs must be at least 1".to_string(),
            });
        }
        if let Some((name, _)) = self.repositories.iter().find(|(_, url)| url.trim().is_empty()) {
            return Err(BranchError::ConfigError {
                message: format!("repository '{name}' has an empty URL"),
            });
        }
        if self.extra_repositories.iter().any(|url| url.trim().is_empty()) {
            return Err(BranchError::ConfigError {
                message: "a repository URL given on the command line is empty".to_string(),
            });
        }
        Ok(())
    }

    /// Adds a remote repository, replacing any with the same name.
    pub fn add_repository(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.repositories.insert(name.into(), url.into());
    }

    /// Effective parallelism of the validation gate.
    #[must_use]
    pub fn max_parallel(&self) -> usize {
        self.max_parallel.unwrap_or_else(default_max_parallel)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The local repository directory with `~` and environment variables expanded.
    ///
    /// # Errors
    ///
    /// Fails when the path references an undefined environment variable.
    pub fn local_repository_path(&self) -> Result<Option<PathBuf>> {
        self.local_repository
            .as_deref()
            .map(|raw| {
                shellexpand::full(raw)
                    .map(|expanded| PathBuf::from(expanded.as_ref()))
                    .with_context(|| format!("Failed to expand local repository path: {raw}"))
            })
            .transpose()
    }

    /// Builds the repositories to consult: the local repository first, then the
    /// extra repositories in the order given, then the named remote repositories in
    /// name order.
    ///
    /// # Errors
    ///
    /// Returns [`BranchError::ConfigError`] when no repository is configured, and
    /// fails when an HTTP client cannot be created.
    pub fn repository_set(&self) -> Result<RepositorySet> {
        let mut set = RepositorySet::default();
        if let Some(root) = self.local_repository_path()? {
            set.push(Repository::Local(LocalRepository::new("local", root)));
        }
        let extra = self
            .extra_repositories
            .iter()
            .enumerate()
            .map(|(index, url)| (format!("cli-{}", index + 1), url));
        let named = self.repositories.iter().map(|(name, url)| (name.clone(), url));
        for (name, url) in extra.chain(named) {
            let remote = RemoteRepository::new(name.clone(), url, self.request_timeout())
                .with_context(|| format!("Failed to set up repository '{name}'"))?;
            set.push(Repository::Remote(remote));
        }

        if set.is_empty() {
            return Err(BranchError::ConfigError {
                message: "no repository configured to check branched artifacts against"
                    .to_string(),
            }
            .into());
        }
        Ok(set)
    }
}
