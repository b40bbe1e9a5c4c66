//! Branch tag derivation and the branch version transform.
//!
//! A development branch gets its own artifacts by inserting a short tag into every
//! SNAPSHOT version of the tree: `1.0-SNAPSHOT` becomes `1.0-ABC-123-SNAPSHOT`, or
//! `ABC-123-1.0-SNAPSHOT` in prepend mode. Prepend mode is useful when dependency
//! ranges are in use and the branched versions must fall outside of them.
//!
//! The tag is derived once from the raw branch name and every rewrite (project
//! version, parent version, property values, existence checks) goes through the same
//! [`Brancher`], so the whole tree ends up with a single consistent tag.
//!
//! # Examples
//!
//! ```rust
//! use pombranch::version::{BranchTag, Brancher};
//!
//! let tag = BranchTag::derive("feature/ABC-123-add-login").unwrap();
//! assert_eq!(tag.as_str(), "ABC-123");
//!
//! let brancher = Brancher::new(tag, false);
//! assert_eq!(brancher.branch("1.0-SNAPSHOT"), "1.0-ABC-123-SNAPSHOT");
//! // Already branched versions are left alone.
//! assert_eq!(brancher.branch("1.0-ABC-123-SNAPSHOT"), "1.0-ABC-123-SNAPSHOT");
//! ```

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

use crate::constants::{MAX_BRANCH_TAG_LEN, SNAPSHOT_SUFFIX};

fn ticket_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Z]+-[0-9]+").expect("ticket pattern is valid"))
}

/// Computes the branch-qualified version of `current_version`.
///
/// - If `current_version` already contains `tag`, it is returned unchanged.
/// - With `prepend`, the result is `tag-current_version`.
/// - Otherwise the tag is inserted right before the first `-SNAPSHOT`; versions
///   without that marker are returned unchanged.
#[must_use]
pub fn branched_version(current_version: &str, tag: &str, prepend: bool) -> String {
    if current_version.contains(tag) {
        current_version.to_string()
    } else if prepend {
        format!("{tag}-{current_version}")
    } else {
        current_version.replacen(SNAPSHOT_SUFFIX, &format!("-{tag}{SNAPSHOT_SUFFIX}"), 1)
    }
}

/// Removes leading path elements: everything up to and including the last `/`.
#[must_use]
pub fn trim_path(branch: &str) -> &str {
    branch.rsplit_once('/').map_or(branch, |(_, name)| name)
}

/// Drops every character that is not an ASCII letter, digit, `_` or `-`.
#[must_use]
pub fn sanitize_branch(branch: &str) -> String {
    branch.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-').collect()
}

/// Shortens a branch name to the first ticket-style token (`ABC-123`), or to its
/// first ten characters when there is none.
#[must_use]
pub fn truncate_branch(branch: &str) -> String {
    match ticket_regex().find(branch) {
        Some(ticket) => ticket.as_str().to_string(),
        None => branch.chars().take(MAX_BRANCH_TAG_LEN).collect(),
    }
}

/// A short, build-metadata-safe identifier derived from a branch name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BranchTag(String);

impl BranchTag {
    /// Derives the tag for a raw branch name.
    ///
    /// Returns `None` for a blank branch, or when nothing usable survives
    /// sanitizing (for example `"release/"`).
    #[must_use]
    pub fn derive(raw_branch: &str) -> Option<Self> {
        if raw_branch.trim().is_empty() {
            return None;
        }
        let tag = truncate_branch(&sanitize_branch(trim_path(raw_branch)));
        if tag.is_empty() { None } else { Some(Self(tag)) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Applies one branch tag and mode to every version of the tree.
#[derive(Debug, Clone)]
pub struct Brancher {
    tag: BranchTag,
    prepend: bool,
}

impl Brancher {
    #[must_use]
    pub const fn new(tag: BranchTag, prepend: bool) -> Self {
        Self {
            tag,
            prepend,
        }
    }

    #[must_use]
    pub const fn tag(&self) -> &BranchTag {
        &self.tag
    }

    #[must_use]
    pub const fn prepend(&self) -> bool {
        self.prepend
    }

    /// The branched form of `version`; see [`branched_version`].
    #[must_use]
    pub fn branch(&self, version: &str) -> String {
        branched_version(version, self.tag.as_str(), self.prepend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_branch() {
        assert_eq!(truncate_branch("ABC-123-456-foo"), "ABC-123");
        assert_eq!(truncate_branch("890-ABC-123-456-foo"), "ABC-123");
        assert_eq!(truncate_branch("abc-ABC-123-456-foo"), "ABC-123");
        assert_eq!(truncate_branch("abc-123-def-567"), "abc-123-de");
        assert_eq!(truncate_branch("abc"), "abc");
    }

    #[test]
    fn test_trim_path() {
        assert_eq!(trim_path("foo"), "foo");
        assert_eq!(trim_path("/foo"), "foo");
        assert_eq!(trim_path("a/foo"), "foo");
        assert_eq!(trim_path("a/b/foo"), "foo");
        assert_eq!(trim_path("a/b/"), "");
    }

    #[test]
    fn test_sanitize_branch() {
        assert_eq!(sanitize_branch("ab!@-12^#_\\C*&3\"'"), "ab-12_C3");
        assert_eq!(sanitize_branch("plain-name_1"), "plain-name_1");
    }

    #[test]
    fn test_derive_tag() {
        assert_eq!(BranchTag::derive("feature/ABC-123-login").unwrap().as_str(), "ABC-123");
        assert_eq!(BranchTag::derive("refs/heads/my branch!").unwrap().as_str(), "mybranch");
        assert_eq!(BranchTag::derive("a/b/foo").unwrap().as_str(), "foo");
        assert_eq!(BranchTag::derive("bugfix/very-long-branch-name").unwrap().as_str(), "very-long-");
        assert!(BranchTag::derive("").is_none());
        assert!(BranchTag::derive("   ").is_none());
        assert!(BranchTag::derive("release/").is_none());
        assert!(BranchTag::derive("!!!").is_none());
    }

    #[test]
    fn test_branched_version_suffix_mode() {
        assert_eq!(branched_version("1.0-SNAPSHOT", "ABC-1", false), "1.0-ABC-1-SNAPSHOT");
        assert_eq!(branched_version("1.0", "ABC-1", false), "1.0");
        // Only the first marker is rewritten.
        assert_eq!(
            branched_version("1.0-SNAPSHOT-SNAPSHOT", "ABC-1", false),
            "1.0-ABC-1-SNAPSHOT-SNAPSHOT"
        );
    }

    #[test]
    fn test_branched_version_prepend_mode() {
        assert_eq!(branched_version("1.0-SNAPSHOT", "ABC-1", true), "ABC-1-1.0-SNAPSHOT");
        assert_eq!(branched_version("1.0", "ABC-1", true), "ABC-1-1.0");
    }

    #[test]
    fn test_modes_are_distinct() {
        let suffix = branched_version("2.3-SNAPSHOT", "feat", false);
        let prepend = branched_version("2.3-SNAPSHOT", "feat", true);
        assert_ne!(suffix, prepend);
        assert_eq!(suffix, "2.3-feat-SNAPSHOT");
        assert_eq!(prepend, "feat-2.3-SNAPSHOT");
    }

    #[test]
    fn test_branched_version_is_idempotent() {
        let versions = ["1.0-SNAPSHOT", "1.0", "feat", "3-SNAPSHOT-SNAPSHOT", ""];
        for version in versions {
            for prepend in [false, true] {
                let once = branched_version(version, "feat", prepend);
                let twice = branched_version(&once, "feat", prepend);
                assert_eq!(once, twice, "version={version} prepend={prepend}");
            }
        }
    }

    #[test]
    fn test_brancher_uses_single_tag() {
        let brancher = Brancher::new(BranchTag::derive("JIRA-42").unwrap(), false);
        assert_eq!(brancher.tag().as_str(), "JIRA-42");
        assert!(!brancher.prepend());
        assert_eq!(brancher.branch("5-SNAPSHOT"), "5-JIRA-42-SNAPSHOT");
    }
}
