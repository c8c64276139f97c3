//! Validated component names.

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::sync::OnceLock;

// Layer 2: Third-party crate imports
use regex::Regex;
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use super::error::ComponentNameError;

const NAME_PATTERN: &str = "^[a-z][a-z0-9]*(-[a-z0-9]+)*$";

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The pattern is a compile-time constant; construction cannot fail.
    #[allow(clippy::unwrap_used)]
    RE.get_or_init(|| Regex::new(NAME_PATTERN).unwrap())
}

/// Validated, lowercase kebab-case component name.
///
/// # Examples
///
/// ```rust
/// use lifeline_rt::component::ComponentName;
///
/// let name = ComponentName::parse("db-pool").unwrap();
/// assert_eq!(name.as_str(), "db-pool");
///
/// assert!(ComponentName::parse("DbPool").is_err());
/// assert!(ComponentName::parse("-db").is_err());
/// assert!(ComponentName::parse("db--pool").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentName(String);

impl ComponentName {
    /// Validates and wraps a component name.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentNameError::Empty`] for an empty string and
    /// [`ComponentNameError::InvalidFormat`] when the name is not lowercase
    /// kebab-case.
    pub fn parse(name: &str) -> Result<Self, ComponentNameError> {
        if name.is_empty() {
            return Err(ComponentNameError::Empty);
        }
        if !name_regex().is_match(name) {
            return Err(ComponentNameError::InvalidFormat { name: name.into() });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ComponentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
