//! Error types for component identity.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors that can occur while validating a component name.
///
/// Component names must be lowercase kebab-case: one or more groups of
/// `[a-z0-9]` separated by single dashes, starting with a letter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentNameError {
    /// The name is empty.
    #[error("Component name is empty")]
    Empty,

    /// The name does not match the lowercase kebab-case pattern.
    #[error("Invalid component name '{name}': must be lowercase kebab-case (e.g. 'db-pool')")]
    InvalidFormat { name: String },
}

impl ComponentNameError {
    /// Returns the offending name, if one was supplied.
    pub fn name(&self) -> Option<&str> {
        match self {
            ComponentNameError::Empty => None,
            ComponentNameError::InvalidFormat { name } => Some(name),
        }
    }
}
