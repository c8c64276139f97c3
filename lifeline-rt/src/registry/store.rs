//! The insertion-ordered component registry.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use super::entry::RegistryEntry;
use super::types::{InsertPosition, RegistrationCode};
use crate::component::{Component, ComponentState};

/// Structural insertion failures, before any topology check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// Another component with this name is already registered.
    #[error("Component '{name}' is already registered")]
    DuplicateName { name: String },

    /// This exact instance is already registered (under any name).
    #[error("Component instance '{name}' is already registered")]
    DuplicateInstance { name: String },

    /// The `Before`/`After` anchor does not exist.
    #[error("Insertion target '{target}' is not registered")]
    TargetNotFound { target: String },

    /// The position is anchored on the component being inserted.
    #[error("Component '{name}' cannot be inserted relative to itself")]
    InvalidPosition { name: String },
}

impl InsertError {
    /// Maps the structural failure onto its registration code.
    pub fn code(&self) -> RegistrationCode {
        match self {
            InsertError::DuplicateName { .. } => RegistrationCode::DuplicateName,
            InsertError::DuplicateInstance { .. } => RegistrationCode::DuplicateInstance,
            InsertError::TargetNotFound { .. } => RegistrationCode::TargetNotFound,
            InsertError::InvalidPosition { .. } => RegistrationCode::InvalidPosition,
        }
    }
}

/// Insertion-ordered sequence of registered components.
///
/// Owned by the manager and mutated only under its lock. Positions are plain
/// vector indices; the resolver tie-breaks on them, which is what makes the
/// startup order deterministic for a given registry content and insertion
/// history.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    entries: Vec<RegistryEntry>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no components are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a component with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Position of the named component in the sequence.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Entry lookup by name.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Mutable entry lookup by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut RegistryEntry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }

    /// Iterates entries in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Iterates entries mutably in registry order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RegistryEntry> {
        self.entries.iter_mut()
    }

    /// All names in registry order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Names of components in the given state, in registry order.
    pub fn names_in_state(&self, state: ComponentState) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.record.state == state)
            .map(|e| e.name.clone())
            .collect()
    }

    /// Count of components in the given state.
    pub fn count_in_state(&self, state: ComponentState) -> usize {
        self.entries
            .iter()
            .filter(|e| e.record.state == state)
            .count()
    }

    /// Returns `true` if this exact instance is already registered.
    pub fn has_instance(&self, component: &Arc<dyn Component>) -> bool {
        self.entries
            .iter()
            .any(|e| Arc::ptr_eq(&e.component, component))
    }

    /// Resolves the index a position maps to, without mutating.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::TargetNotFound`] for a missing anchor and
    /// [`InsertError::InvalidPosition`] when the anchor is the inserted
    /// component itself.
    pub fn resolve_index(
        &self,
        name: &str,
        position: &InsertPosition,
    ) -> Result<usize, InsertError> {
        match position {
            InsertPosition::Start => Ok(0),
            InsertPosition::End => Ok(self.entries.len()),
            InsertPosition::Before(target) | InsertPosition::After(target) => {
                if target == name {
                    return Err(InsertError::InvalidPosition { name: name.into() });
                }
                let anchor =
                    self.position(target)
                        .ok_or_else(|| InsertError::TargetNotFound {
                            target: target.clone(),
                        })?;
                Ok(match position {
                    InsertPosition::Before(_) => anchor,
                    _ => anchor + 1,
                })
            }
        }
    }

    /// Inserts an entry at the resolved position after duplicate checks.
    ///
    /// Topology validation happens before this call, against
    /// [`ComponentRegistry::trial_nodes_with`]; this method only performs
    /// the structural checks and the mutation.
    ///
    /// # Errors
    ///
    /// Returns an [`InsertError`] and leaves the registry unchanged.
    pub fn insert(
        &mut self,
        entry: RegistryEntry,
        position: &InsertPosition,
    ) -> Result<usize, InsertError> {
        if self.contains(&entry.name) {
            return Err(InsertError::DuplicateName { name: entry.name });
        }
        if self.has_instance(&entry.component) {
            return Err(InsertError::DuplicateInstance { name: entry.name });
        }
        let index = self.resolve_index(&entry.name, position)?;
        self.entries.insert(index, entry);
        Ok(index)
    }

    /// Removes and returns the named entry.
    pub fn remove(&mut self, name: &str) -> Option<RegistryEntry> {
        let index = self.position(name)?;
        Some(self.entries.remove(index))
    }

    /// Resolver input for the current registry: `(name, dependencies)` in
    /// registry order.
    pub fn dependency_nodes(&self) -> Vec<(String, Vec<String>)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.dependencies.clone()))
            .collect()
    }

    /// Resolver input including the optional flag, for validation.
    pub fn validation_nodes(&self) -> Vec<(String, Vec<String>, bool)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.dependencies.clone(), e.optional))
            .collect()
    }

    /// Resolver input for a trial registry with `(name, dependencies)`
    /// inserted at the index `position` resolves to.
    ///
    /// This is the commit rule's trial copy: the real registry is only
    /// mutated if the resolver accepts this list.
    ///
    /// # Errors
    ///
    /// Returns the same structural errors as [`ComponentRegistry::insert`].
    pub fn trial_nodes_with(
        &self,
        name: &str,
        dependencies: &[String],
        position: &InsertPosition,
    ) -> Result<Vec<(String, Vec<String>)>, InsertError> {
        let index = self.resolve_index(name, position)?;
        let mut nodes = self.dependency_nodes();
        nodes.insert(index, (name.to_string(), dependencies.to_vec()));
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::BoxError;
    use async_trait::async_trait;

    struct Named(&'static str, Vec<String>);

    #[async_trait]
    impl Component for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn dependencies(&self) -> Vec<String> {
            self.1.clone()
        }

        async fn start(&self) -> Result<(), BoxError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), BoxError> {
            Ok(())
        }
    }

    fn entry(name: &'static str) -> RegistryEntry {
        RegistryEntry::new(Arc::new(Named(name, Vec::new())))
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_insert_end_and_start() {
        let mut registry = ComponentRegistry::new();
        registry.insert(entry("db"), &InsertPosition::End).unwrap();
        registry.insert(entry("api"), &InsertPosition::End).unwrap();
        registry
            .insert(entry("config"), &InsertPosition::Start)
            .unwrap();
        assert_eq!(registry.names(), vec!["config", "db", "api"]);
        assert_eq!(registry.position("db"), Some(1));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_insert_before_after() {
        let mut registry = ComponentRegistry::new();
        registry.insert(entry("db"), &InsertPosition::End).unwrap();
        registry.insert(entry("api"), &InsertPosition::End).unwrap();
        registry
            .insert(entry("cache"), &InsertPosition::Before("api".into()))
            .unwrap();
        registry
            .insert(entry("metrics"), &InsertPosition::After("db".into()))
            .unwrap();
        assert_eq!(registry.names(), vec!["db", "metrics", "cache", "api"]);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_duplicate_name_rejected() {
        let mut registry = ComponentRegistry::new();
        registry.insert(entry("db"), &InsertPosition::End).unwrap();
        let err = registry.insert(entry("db"), &InsertPosition::End).err().unwrap();
        assert_eq!(err.code(), RegistrationCode::DuplicateName);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_duplicate_instance_rejected() {
        let mut registry = ComponentRegistry::new();
        let shared: Arc<dyn Component> = Arc::new(Named("db", Vec::new()));
        registry
            .insert(RegistryEntry::new(Arc::clone(&shared)), &InsertPosition::End)
            .unwrap();

        // Same instance under a different cached name is still rejected.
        let mut dup = RegistryEntry::new(Arc::clone(&shared));
        dup.name = "db-two".into();
        let err = registry.insert(dup, &InsertPosition::End).err().unwrap();
        assert_eq!(err.code(), RegistrationCode::DuplicateInstance);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_target_not_found() {
        let registry = ComponentRegistry::new();
        let err = registry
            .resolve_index("db", &InsertPosition::Before("ghost".into()))
            .err()
            .unwrap();
        assert_eq!(err.code(), RegistrationCode::TargetNotFound);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_self_anchored_position_invalid() {
        let registry = ComponentRegistry::new();
        let err = registry
            .resolve_index("db", &InsertPosition::After("db".into()))
            .err()
            .unwrap();
        assert_eq!(err.code(), RegistrationCode::InvalidPosition);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_trial_nodes_do_not_mutate() {
        let mut registry = ComponentRegistry::new();
        registry.insert(entry("db"), &InsertPosition::End).unwrap();

        let nodes = registry
            .trial_nodes_with("api", &["db".to_string()], &InsertPosition::Start)
            .unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].0, "api");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_remove() {
        let mut registry = ComponentRegistry::new();
        registry.insert(entry("db"), &InsertPosition::End).unwrap();
        let removed = registry.remove("db").unwrap();
        assert_eq!(removed.name, "db");
        assert!(registry.is_empty());
        assert!(registry.remove("db").is_none());
    }
}
