//! Version recognition and the branch version transform.
//!
//! - [`is_snapshot`] decides whether a version string denotes an unreleased,
//!   mutable build.
//! - [`branch`] derives a short branch tag from a raw branch name and inserts it
//!   into versions consistently across the module tree.

pub mod branch;

pub use branch::{BranchTag, Brancher, branched_version};

use regex::Regex;
use std::sync::OnceLock;

use crate::constants::SNAPSHOT_QUALIFIER;

fn timestamped_snapshot_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(.*)-([0-9]{8}\.[0-9]{6})-([0-9]+)$").expect("timestamp pattern is valid")
    })
}

/// Returns `true` for SNAPSHOT versions.
///
/// A version is a SNAPSHOT when it ends with `SNAPSHOT` (any case) or when it is
/// a deployed, timestamped snapshot such as `1.0-20240131.101500-7`.
///
/// # Examples
///
/// ```rust
/// use pombranch::version::is_snapshot;
///
/// assert!(is_snapshot("1.0-SNAPSHOT"));
/// assert!(is_snapshot("1.0-snapshot"));
/// assert!(is_snapshot("1.0-20240131.101500-7"));
/// assert!(!is_snapshot("1.0"));
/// ```
#[must_use]
pub fn is_snapshot(version: &str) -> bool {
    let qualifier_len = SNAPSHOT_QUALIFIER.len();
    if version.len() >= qualifier_len {
        let tail = &version.as_bytes()[version.len() - qualifier_len..];
        if tail.eq_ignore_ascii_case(SNAPSHOT_QUALIFIER.as_bytes()) {
            return true;
        }
    }
    timestamped_snapshot_regex().is_match(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_snapshot_suffix() {
        assert!(is_snapshot("1.0-SNAPSHOT"));
        assert!(is_snapshot("1.0-ABC-123-SNAPSHOT"));
        assert!(is_snapshot("SNAPSHOT"));
        assert!(is_snapshot("2.1.0-Snapshot"));
    }

    #[test]
    fn test_is_snapshot_timestamped() {
        assert!(is_snapshot("1.0-20240131.101500-7"));
        assert!(!is_snapshot("1.0-2024013.101500-7"));
    }

    #[test]
    fn test_is_not_snapshot() {
        assert!(!is_snapshot(""));
        assert!(!is_snapshot("1.0"));
        assert!(!is_snapshot("${lib.version}"));
        assert!(!is_snapshot("1.0-SNAPSHOT-final"));
        assert!(!is_snapshot("ÄÖÜ"));
    }
}
