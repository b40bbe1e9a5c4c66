//! HTTP repository consulted through artifact-level metadata.
//!
//! For `org.example:core:1.0-X-SNAPSHOT` the repository at `https://repo.example/maven`
//! is asked for
//!
//! ```text
//! https://repo.example/maven/org/example/core/maven-metadata.xml
//! ```
//!
//! and the artifact exists when that document lists `<version>1.0-X-SNAPSHOT</version>`.
//! A 404 means the artifact was never deployed. Transport failures are retried with
//! exponential backoff; any other status, or a transport failure that outlives the
//! retries, is a failed lookup and aborts the rewrite.

use anyhow::Result;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::debug;

use super::ArtifactResolver;
use crate::constants::{MAX_BACKOFF_DELAY_MS, MAX_REQUEST_RETRIES, STARTING_BACKOFF_DELAY_MS};
use crate::core::BranchError;
use crate::models::GroupArtifactVersion;

const METADATA_FILE: &str = "maven-metadata.xml";

/// A remote repository reachable over HTTP(S).
#[derive(Debug, Clone)]
pub struct RemoteRepository {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl RemoteRepository {
    /// Creates a repository client with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be initialised.
    pub fn new(name: impl Into<String>, url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            name: name.into(),
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL of the artifact-level metadata for `artifact`.
    #[must_use]
    pub fn metadata_url(&self, artifact: &GroupArtifactVersion) -> String {
        format!("{}/{}/{}/{METADATA_FILE}", self.url, artifact.group_path(), artifact.artifact_id)
    }

    async fn lookup(&self, artifact: &GroupArtifactVersion) -> Result<bool> {
        let url = self.metadata_url(artifact);
        let unavailable = |reason: String| BranchError::RepositoryUnavailable {
            artifact: artifact.to_string(),
            reason,
        };

        let strategy = ExponentialBackoff::from_millis(STARTING_BACKOFF_DELAY_MS)
            .max_delay(Duration::from_millis(MAX_BACKOFF_DELAY_MS))
            .factor(2)
            .take(MAX_REQUEST_RETRIES);

        let response = Retry::spawn(strategy, || {
            debug!("GET {}", url);
            self.client.get(&url).send()
        })
        .await
        .map_err(|e| unavailable(format!("{} is unreachable: {e}", self.name)))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("No metadata for {} in {}", artifact, self.name);
                Ok(false)
            }
            status if status.is_success() => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| unavailable(format!("cannot read {url}: {e}")))?;
                let listed = lists_version(&body, &artifact.version);
                debug!("Metadata of {} in {} lists {}: {}", artifact, self.name, artifact.version, listed);
                Ok(listed)
            }
            status => Err(unavailable(format!("HTTP {status} from {url}")).into()),
        }
    }
}

impl ArtifactResolver for RemoteRepository {
    fn exists(&self, artifact: &GroupArtifactVersion) -> impl Future<Output = Result<bool>> + Send {
        self.lookup(artifact)
    }
}

/// Whether a metadata document lists `version` in a `<version>` element.
fn lists_version(metadata: &str, version: &str) -> bool {
    metadata
        .split("<version>")
        .skip(1)
        .filter_map(|element| element.split_once("</version>"))
        .any(|(listed, _)| listed.trim() == version)
}
