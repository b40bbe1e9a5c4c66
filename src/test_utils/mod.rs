//! Test utilities shared by unit and integration tests.
//!
//! Available to integration tests through the `test-utils` feature. The centerpiece
//! is the modulo-three reactor: 24 library properties `lib1..lib24` spread over two
//! modules and their profiles, each consumed by exactly one dependency. Paired with
//! [`modulo_three_resolver`], exactly the properties with index `3k + 1` are
//! accepted:
//!
//! | index    | value            | resolver |
//! |----------|------------------|----------|
//! | `3k`     | `N.0`            | not a SNAPSHOT, never asked |
//! | `3k + 1` | `N.0-SNAPSHOT`   | `true` |
//! | `3k + 2` | `N.0-SNAPSHOT`   | `false` |

use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::sync::{Once, OnceLock};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::models::{Dependency, GroupArtifactVersion, ModuleDescriptor, Parent, Profile, PropertyInstance};
use crate::reactor::Reactor;
use crate::version::branched_version;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Group id of every library in the modulo-three reactor.
pub const LIB_GROUP: &str = "org.example.libs";

/// Module id of the root of the modulo-three reactor.
pub const ROOT_MODULE: &str = "branch";

/// Module id of the child of the modulo-three reactor.
pub const CHILD_MODULE: &str = "branch-module";

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG` when set, otherwise leaves logging off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

fn lib_value(index: u32) -> String {
    if index % 3 == 0 { format!("{index}.0") } else { format!("{index}.0-SNAPSHOT") }
}

fn bind(properties: &mut std::collections::BTreeMap<String, String>, range: std::ops::RangeInclusive<u32>) {
    for index in range {
        properties.insert(format!("lib{index}"), lib_value(index));
    }
}

/// Dependencies on the libraries of `range`, alternating between the plain and
/// the managed section.
fn consume(
    dependencies: &mut Vec<Dependency>,
    managed: &mut Vec<Dependency>,
    range: std::ops::RangeInclusive<u32>,
) {
    for index in range {
        let dependency = Dependency::new(LIB_GROUP, format!("lib{index}"), format!("${{lib{index}}}"));
        if index % 2 == 0 { managed.push(dependency) } else { dependencies.push(dependency) }
    }
}

/// Builds the 24-property reactor.
///
/// - `branch` (root, `1.0-SNAPSHOT`): `lib1..lib9`, profile `root-profile`:
///   `lib10..lib18`
/// - `branch-module` (inherits its version): `lib19..lib21`, profile
///   `module-profile`: `lib22..lib24`
///
/// Every dependency sits next to the binding it consumes.
#[must_use]
pub fn modulo_three_reactor() -> Reactor {
    let mut root = ModuleDescriptor::new(ROOT_MODULE);
    root.group_id = Some("org.example".to_string());
    root.version = Some("1.0-SNAPSHOT".to_string());
    bind(&mut root.properties, 1..=9);
    consume(&mut root.dependencies, &mut root.dependency_management, 1..=9);

    let mut root_profile = Profile::new("root-profile");
    bind(&mut root_profile.properties, 10..=18);
    consume(&mut root_profile.dependencies, &mut root_profile.dependency_management, 10..=18);
    root.profiles.push(root_profile);

    let mut child = ModuleDescriptor::new(CHILD_MODULE);
    child.parent = Some(Parent {
        group_id: "org.example".to_string(),
        artifact_id: ROOT_MODULE.to_string(),
        version: Some("1.0-SNAPSHOT".to_string()),
    });
    bind(&mut child.properties, 19..=21);
    consume(&mut child.dependencies, &mut child.dependency_management, 19..=21);

    let mut child_profile = Profile::new("module-profile");
    bind(&mut child_profile.properties, 22..=24);
    consume(&mut child_profile.dependencies, &mut child_profile.dependency_management, 22..=24);
    child.profiles.push(child_profile);

    Reactor {
        modules: vec![root, child],
    }
}

fn leading_number(version: &str) -> Option<u32> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"^[0-9]+").expect("leading number pattern"));
    pattern.find(version).and_then(|m| m.as_str().parse().ok())
}

/// Reports an artifact as present exactly when the leading number of its version
/// is `1` modulo three.
///
/// # Errors
///
/// Never fails; the signature matches [`ArtifactResolver`](crate::repository::ArtifactResolver).
pub fn modulo_three_resolver(artifact: &GroupArtifactVersion) -> Result<bool> {
    Ok(leading_number(&artifact.version).is_some_and(|n| n % 3 == 1))
}

/// The bindings the modulo-three reactor must accept.
#[must_use]
pub fn expected_modulo_three_changes() -> Vec<PropertyInstance> {
    let origin = |index: u32| match index {
        1..=9 => (ROOT_MODULE, None),
        10..=18 => (ROOT_MODULE, Some("root-profile")),
        19..=21 => (CHILD_MODULE, None),
        _ => (CHILD_MODULE, Some("module-profile")),
    };
    (1..=24)
        .filter(|index| index % 3 == 1)
        .map(|index| {
            let (module, profile) = origin(index);
            PropertyInstance::new(module, profile, format!("lib{index}"), lib_value(index))
        })
        .collect()
}

/// Lays out a local repository under `root` holding the branched versions that
/// [`modulo_three_resolver`] reports as present, for suffix mode and `tag`.
///
/// # Errors
///
/// Fails when a directory cannot be created.
pub fn publish_modulo_three_artifacts(root: &Path, tag: &str) -> Result<()> {
    for index in (1..=24).filter(|index| index % 3 == 1) {
        let version = branched_version(&lib_value(index), tag, false);
        std::fs::create_dir_all(root.join("org/example/libs").join(format!("lib{index}")).join(version))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_shape() {
        let reactor = modulo_three_reactor();
        reactor.validate().unwrap();

        let bound: usize = reactor
            .modules
            .iter()
            .flat_map(|module| module.property_tables())
            .map(|(_, table)| table.len())
            .sum();
        let consumers = reactor.modules.iter().flat_map(|module| module.all_dependencies()).count();
        assert_eq!(bound, 24);
        assert_eq!(consumers, 24);
        assert_eq!(expected_modulo_three_changes().len(), 8);
    }

    #[test]
    fn test_modulo_three_resolver() {
        let gav = |version: &str| GroupArtifactVersion {
            group_id: LIB_GROUP.to_string(),
            artifact_id: "lib".to_string(),
            version: version.to_string(),
        };
        assert!(modulo_three_resolver(&gav("4.0-T-SNAPSHOT")).unwrap());
        assert!(!modulo_three_resolver(&gav("5.0-T-SNAPSHOT")).unwrap());
        assert!(!modulo_three_resolver(&gav("T-4.0-SNAPSHOT")).unwrap());
    }
}
