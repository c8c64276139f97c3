//! Component registry and dependency resolution.
//!
//! The registry is an insertion-ordered sequence of components with
//! duplicate detection and positional insertion. The resolver computes the
//! deterministic topological startup order over it and extracts concrete
//! cycles for error reporting. Proposed insertions are validated against a
//! trial order before anything is committed.

// Module declarations
pub mod entry;
pub mod resolver;
pub mod store;
pub mod types;

// Re-exports for convenient access
pub use entry::RegistryEntry;
pub use store::{ComponentRegistry, InsertError};
pub use resolver::{find_cycle, startup_order, validate_dependencies, CycleError};
pub use types::{
    InsertPosition, MissingDependency, RegistrationCode, RegistrationReport, ValidationReport,
};
