use std::fmt;

/// One concrete `(module, profile, name, value)` binding found during collection.
///
/// The same property name may be bound independently in every module and profile;
/// each binding is its own instance and is accepted or rejected on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyInstance {
    pub module: String,
    /// `None` for the module's own property table.
    pub profile: Option<String>,
    pub name: String,
    pub value: String,
}

impl PropertyInstance {
    #[must_use]
    pub fn new(
        module: impl Into<String>,
        profile: Option<&str>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            profile: profile.map(str::to_string),
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for PropertyInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.profile {
            Some(profile) => {
                write!(f, "{}[{}] ${{{}}} = {}", self.module, profile, self.name, self.value)
            }
            None => write!(f, "{} ${{{}}} = {}", self.module, self.name, self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_is_full_tuple() {
        let root = PropertyInstance::new("root", None, "lib", "1.0-SNAPSHOT");
        let profiled = PropertyInstance::new("root", Some("ci"), "lib", "1.0-SNAPSHOT");
        let other_module = PropertyInstance::new("child", None, "lib", "1.0-SNAPSHOT");

        let set: HashSet<_> =
            [root.clone(), profiled, other_module, root.clone()].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&root));
    }

    #[test]
    fn test_display() {
        let binding = PropertyInstance::new("root", Some("ci"), "lib", "1.0-SNAPSHOT");
        assert_eq!(binding.to_string(), "root[ci] ${lib} = 1.0-SNAPSHOT");
    }
}
