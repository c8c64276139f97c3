//! Registry entries: a component plus its manager-owned state record.

// Layer 1: Standard library imports
use std::fmt;
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::component::{Component, ComponentRecord, ComponentState};

/// A registered component together with its per-instance state record.
///
/// The manager is the sole owner of registry entries; the component itself
/// is shared (`Arc`) so that lifecycle engines can invoke user code without
/// holding the registry lock.
pub struct RegistryEntry {
    /// The component instance.
    pub component: Arc<dyn Component>,

    /// The component's validated name (cached from `component.name()`).
    pub name: String,

    /// Declared dependencies (cached at registration).
    pub dependencies: Vec<String>,

    /// Whether the component is optional (cached at registration).
    pub optional: bool,

    /// Per-instance lifecycle state record.
    pub record: ComponentRecord,
}

impl RegistryEntry {
    /// Creates an entry in the `Registered` state, caching the component's
    /// declared data.
    pub fn new(component: Arc<dyn Component>) -> Self {
        let name = component.name().to_string();
        let dependencies = component.dependencies();
        let optional = component.optional();
        Self {
            component,
            name,
            dependencies,
            optional,
            record: ComponentRecord::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ComponentState {
        self.record.state
    }

    /// Returns `true` if the component is running.
    pub fn is_running(&self) -> bool {
        self.record.state.is_running()
    }

    /// Returns `true` if the component is stalled.
    pub fn is_stalled(&self) -> bool {
        self.record.state.is_stalled()
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("optional", &self.optional)
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}
