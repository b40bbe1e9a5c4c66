//! Global constants used throughout the pombranch codebase.
//!
//! This module contains timeout durations, retry parameters, parallelism
//! defaults and the version markers shared by the resolver and the rewriter.

use std::time::Duration;

/// Suffix marker of a SNAPSHOT version, used by the branch transform.
pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Qualifier compared case-insensitively when recognizing SNAPSHOT versions.
pub const SNAPSHOT_QUALIFIER: &str = "SNAPSHOT";

/// Maximum length of a branch tag when no ticket token is present.
pub const MAX_BRANCH_TAG_LEN: usize = 10;

/// Default timeout for a single repository metadata request (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum backoff delay for exponential backoff (500ms).
///
/// Exponential backoff delays are capped at this value to prevent
/// excessive wait times during retry operations.
pub const MAX_BACKOFF_DELAY_MS: u64 = 500;

/// Starting delay for exponential backoff (10ms).
pub const STARTING_BACKOFF_DELAY_MS: u64 = 10;

/// Number of retries for transport failures against a remote repository.
pub const MAX_REQUEST_RETRIES: usize = 3;

/// Minimum number of parallel existence checks regardless of CPU count.
///
/// Existence checks are I/O-bound, so the floor is higher than the core count
/// of small CI machines.
pub const MIN_PARALLELISM: usize = 10;

/// Multiplier applied to CPU core count for default parallelism.
pub const PARALLELISM_CORE_MULTIPLIER: usize = 2;

/// Default CPU core count when detection fails.
pub const FALLBACK_CORE_COUNT: usize = 4;

/// Default number of bindings validated concurrently.
#[must_use]
pub fn default_max_parallel() -> usize {
    let cores = std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(FALLBACK_CORE_COUNT);
    (cores * PARALLELISM_CORE_MULTIPLIER).max(MIN_PARALLELISM)
}

/// Environment variable overriding the global config path.
pub const CONFIG_ENV_VAR: &str = "POMBRANCH_CONFIG";
