//! Collection of property bindings, aliases and property-bound dependencies.
//!
//! Collection runs in two passes over the whole reactor:
//!
//! 1. **Properties**: every non-empty property of every module and profile is either
//!    a SNAPSHOT binding (recorded as a [`PropertyInstance`] under its name) or, if
//!    its value is a `${...}` reference, an alias edge `name -> referenced name`.
//!    A name aliased differently in two modules keeps both edges.
//! 2. **Dependencies**: every dependency declaration (top-level, dependency
//!    management, and both sections of every profile) whose version is a reference
//!    is resolved through the alias edges; its `(group, artifact)` is recorded
//!    against every bound property the reference reaches.
//!
//! The second pass needs the complete alias and binding maps, so all properties are
//! collected before any dependency. Accumulation is purely additive, and after
//! [`CollectedProperties::collect`] returns the maps are only read.

use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, trace};

use super::reference::{parse_reference, resolve_reference};
use crate::models::{Dependency, GroupArtifact, ModuleDescriptor, PropertyInstance};
use crate::version::is_snapshot;

/// The three maps produced by collection.
#[derive(Debug, Default, Clone)]
pub struct CollectedProperties {
    /// property name -> every (module, profile) SNAPSHOT binding of that name
    bindings: HashMap<String, HashSet<PropertyInstance>>,
    /// property name -> every property name its values reference
    aliases: HashMap<String, BTreeSet<String>>,
    /// property name -> every (group, artifact) whose version resolves to it
    dependents: HashMap<String, HashSet<GroupArtifact>>,
}

impl CollectedProperties {
    /// Collects bindings, aliases and dependents from all modules.
    #[must_use]
    pub fn collect(modules: &[ModuleDescriptor]) -> Self {
        let mut collected = Self::default();
        for module in modules {
            collected.collect_properties(module);
        }
        for module in modules {
            collected.collect_dependencies(module);
        }
        debug!(
            "Collected {} SNAPSHOT bindings, {} aliases and {} property-bound dependencies from {} modules",
            collected.bindings.values().map(HashSet::len).sum::<usize>(),
            collected.aliases.values().map(BTreeSet::len).sum::<usize>(),
            collected.dependents.values().map(HashSet::len).sum::<usize>(),
            modules.len()
        );
        collected
    }

    fn collect_properties(&mut self, module: &ModuleDescriptor) {
        for (profile, table) in module.property_tables() {
            for (name, value) in table {
                if value.is_empty() {
                    continue;
                }
                if is_snapshot(value) {
                    trace!("Binding {}{:?}: {} = {}", module.module_id(), profile, name, value);
                    self.bindings.entry(name.clone()).or_default().insert(PropertyInstance::new(
                        module.module_id(),
                        profile,
                        name,
                        value,
                    ));
                } else if let Some(reference) = parse_reference(value) {
                    trace!("Alias {} -> {}", name, reference);
                    self.aliases.entry(name.clone()).or_default().insert(reference.to_string());
                }
            }
        }
    }

    fn collect_dependencies(&mut self, module: &ModuleDescriptor) {
        for dependency in module.all_dependencies() {
            self.collect_dependency(dependency);
        }
    }

    fn collect_dependency(&mut self, dependency: &Dependency) {
        let Some(reference) = dependency.version.as_deref().and_then(parse_reference) else {
            return;
        };
        let properties: Vec<String> =
            self.resolve_reference(reference).into_iter().map(str::to_string).collect();
        if properties.is_empty() {
            trace!(
                "Dependency {}:{} references unresolved property ${{{}}}",
                dependency.group_id,
                dependency.artifact_id,
                reference
            );
        }
        for property in properties {
            self.dependents.entry(property).or_default().insert(GroupArtifact::from(dependency));
        }
    }

    /// Resolves a referenced property name to the properties carrying a SNAPSHOT value.
    #[must_use]
    pub fn resolve_reference<'a>(&'a self, reference: &'a str) -> BTreeSet<&'a str> {
        resolve_reference(
            reference,
            |name| self.bindings.contains_key(name),
            |name| self.aliases_of(name).collect(),
        )
    }

    /// Every collected binding, across all names.
    pub fn bindings(&self) -> impl Iterator<Item = &PropertyInstance> {
        self.bindings.values().flatten()
    }

    /// Bindings that share `name`, one per (module, profile).
    #[must_use]
    pub fn bindings_named(&self, name: &str) -> Option<&HashSet<PropertyInstance>> {
        self.bindings.get(name)
    }

    /// The properties `name` points at, in name order. Empty unless `name` is an alias.
    pub fn aliases_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.aliases.get(name).into_iter().flatten().map(String::as_str)
    }

    /// Dependencies whose version resolves to `name`.
    #[must_use]
    pub fn dependents(&self, name: &str) -> Option<&HashSet<GroupArtifact>> {
        self.dependents.get(name)
    }
}
