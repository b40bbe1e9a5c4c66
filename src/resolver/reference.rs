//! `${name}` reference parsing and alias-chain resolution.
//!
//! A property value may point at another property instead of carrying a version:
//!
//! ```text
//! core.version   = 2.3-SNAPSHOT
//! api.version    = ${core.version}
//! client.version = ${api.version}
//! ```
//!
//! A dependency whose version is `${client.version}` is therefore bound to
//! `core.version`, two hops away. [`resolve_reference`] walks those hops.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;
use tracing::debug;

fn reference_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\$\{(.*)\}$").expect("reference pattern is valid"))
}

/// Extracts the property name from a value of the exact form `${name}`.
///
/// Values with any text around the wrapper, such as `1.0-${suffix}`, are not
/// references and yield `None`.
///
/// # Examples
///
/// ```rust
/// use pombranch::resolver::parse_reference;
///
/// assert_eq!(parse_reference("${lib.version}"), Some("lib.version"));
/// assert_eq!(parse_reference("v${lib.version}"), None);
/// assert_eq!(parse_reference("1.0-SNAPSHOT"), None);
/// ```
#[must_use]
pub fn parse_reference(value: &str) -> Option<&str> {
    reference_regex().captures(value).and_then(|captures| captures.get(1)).map(|m| m.as_str())
}

/// Follows aliases from `reference` to every property with a literal binding.
///
/// `has_binding` reports whether a name carries at least one SNAPSHOT binding and
/// `aliases_of` returns the names a property points at. A name may be declared as
/// an alias in several modules with different targets, so the walk fans out over
/// all of them and stops at each bound name it reaches. Dead ends contribute
/// nothing, and a name is visited at most once, so a cyclic alias map cannot loop
/// forever. An empty result means the reference is unresolved.
pub fn resolve_reference<'a>(
    reference: &'a str,
    has_binding: impl Fn(&str) -> bool,
    aliases_of: impl Fn(&str) -> Vec<&'a str>,
) -> BTreeSet<&'a str> {
    let mut resolved = BTreeSet::new();
    let mut visited = HashSet::new();
    let mut pending = vec![reference];
    let mut cyclic = false;

    while let Some(current) = pending.pop() {
        if !visited.insert(current) {
            cyclic = true;
            continue;
        }
        if has_binding(current) {
            resolved.insert(current);
        } else {
            pending.extend(aliases_of(current));
        }
    }

    if cyclic && resolved.is_empty() {
        debug!("Reference ${{{}}} is part of an alias cycle; leaving it unresolved", reference);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve<'a>(
        reference: &'a str,
        bound: &[&str],
        aliases: &'a HashMap<String, Vec<String>>,
    ) -> Vec<&'a str> {
        resolve_reference(
            reference,
            |name| bound.iter().any(|b| *b == name),
            |name| {
                aliases
                    .get(name)
                    .map(|targets| targets.iter().map(String::as_str).collect())
                    .unwrap_or_default()
            },
        )
        .into_iter()
        .collect()
    }

    fn aliases(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (from, to) in pairs {
            map.entry((*from).to_string()).or_default().push((*to).to_string());
        }
        map
    }

    #[test]
    fn test_parse_reference_exact_form() {
        assert_eq!(parse_reference("${x}"), Some("x"));
        assert_eq!(parse_reference("${project.version}"), Some("project.version"));
        assert_eq!(parse_reference("${}"), Some(""));
    }

    #[test]
    fn test_parse_reference_rejects_partial_matches() {
        assert_eq!(parse_reference(""), None);
        assert_eq!(parse_reference("x"), None);
        assert_eq!(parse_reference("${x"), None);
        assert_eq!(parse_reference("$x}"), None);
        assert_eq!(parse_reference("pre${x}"), None);
        assert_eq!(parse_reference("${x}post"), None);
        assert_eq!(parse_reference(" ${x}"), None);
    }

    #[test]
    fn test_resolve_direct_binding() {
        let map = aliases(&[("a", "b")]);
        assert_eq!(resolve("a", &["a"], &map), vec!["a"]);
    }

    #[test]
    fn test_resolve_chain() {
        let map = aliases(&[("a", "b"), ("b", "c")]);
        assert_eq!(resolve("a", &["c"], &map), vec!["c"]);
        assert_eq!(resolve("b", &["c"], &map), vec!["c"]);
    }

    #[test]
    fn test_resolve_dead_end() {
        let map = aliases(&[("a", "b"), ("b", "c")]);
        assert!(resolve("a", &[], &map).is_empty());
        assert!(resolve("unknown", &["c"], &map).is_empty());
    }

    #[test]
    fn test_resolve_cycle_is_unresolved() {
        let map = aliases(&[("a", "b"), ("b", "a")]);
        assert!(resolve("a", &[], &map).is_empty());

        let self_loop = aliases(&[("a", "a")]);
        assert!(resolve("a", &[], &self_loop).is_empty());
    }

    #[test]
    fn test_resolve_fans_out_over_conflicting_aliases() {
        // `x` is declared as `${a}` in one module and `${b}` in another.
        let map = aliases(&[("x", "a"), ("x", "b"), ("b", "c")]);
        assert_eq!(resolve("x", &["a", "c"], &map), vec!["a", "c"]);
        assert_eq!(resolve("x", &["c"], &map), vec!["c"]);
    }

    #[test]
    fn test_resolve_cycle_with_exit() {
        let map = aliases(&[("a", "b"), ("b", "a"), ("b", "lib")]);
        assert_eq!(resolve("a", &["lib"], &map), vec!["lib"]);
    }
}
