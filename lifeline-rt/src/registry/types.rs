//! Type definitions for registration and dependency validation.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::Serialize;

// Layer 3: Internal module imports
// (none)

/// Where to place a component in the registry sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "position", content = "target", rename_all = "lowercase")]
pub enum InsertPosition {
    /// Insert at the front of the sequence.
    Start,

    /// Append at the end of the sequence (the `register` default).
    End,

    /// Insert immediately before the named component.
    Before(String),

    /// Insert immediately after the named component.
    After(String),
}

/// Failure codes for registration operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationCode {
    /// The requested position is not usable (e.g. anchored on itself).
    InvalidPosition,

    /// Registration is blocked while a shutdown is in progress.
    ShutdownInProgress,

    /// Registration is blocked for components a running startup depends on.
    StartupInProgress,

    /// This exact component instance is already registered.
    DuplicateInstance,

    /// Another component with the same name is already registered.
    DuplicateName,

    /// The `Before`/`After` anchor does not exist.
    TargetNotFound,

    /// The insertion would create a dependency cycle.
    DependencyCycle,

    /// The component's name is not lowercase kebab-case.
    InvalidName,

    /// An unexpected internal failure.
    UnknownError,
}

impl RegistrationCode {
    /// Kebab-case string form, used in lifecycle events.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationCode::InvalidPosition => "invalid-position",
            RegistrationCode::ShutdownInProgress => "shutdown-in-progress",
            RegistrationCode::StartupInProgress => "startup-in-progress",
            RegistrationCode::DuplicateInstance => "duplicate-instance",
            RegistrationCode::DuplicateName => "duplicate-name",
            RegistrationCode::TargetNotFound => "target-not-found",
            RegistrationCode::DependencyCycle => "dependency-cycle",
            RegistrationCode::InvalidName => "invalid-name",
            RegistrationCode::UnknownError => "unknown-error",
        }
    }
}

/// Outcome of a registration attempt.
///
/// Returned by both `register_component` and `insert_component_at`; on
/// failure the registry is untouched and `code` explains why.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReport {
    /// Whether the registration was committed.
    pub success: bool,

    /// Name the component declared (possibly invalid when `code` is
    /// `InvalidName`).
    pub name: String,

    /// Failure code when `success` is false.
    pub code: Option<RegistrationCode>,

    /// Failure detail (cycle path, offending target, ...).
    pub error: Option<String>,

    /// Registry length before the attempt.
    pub index_before: usize,

    /// Position the component landed at, when committed.
    pub index_after: Option<usize>,

    /// Resolved startup order after the insertion, when committed.
    pub startup_order: Vec<String>,

    /// Whether the manually requested position was honored exactly.
    pub position_respected: bool,

    /// Whether the `Before`/`After` anchor existed; `None` when the
    /// position carries no anchor.
    pub target_found: Option<bool>,
}

impl RegistrationReport {
    /// Builds a failure report with the given code and detail.
    pub fn failure(
        name: impl Into<String>,
        index_before: usize,
        code: RegistrationCode,
        error: Option<String>,
    ) -> Self {
        Self {
            success: false,
            name: name.into(),
            code: Some(code),
            error,
            index_before,
            index_after: None,
            startup_order: Vec::new(),
            position_respected: false,
            target_found: None,
        }
    }
}

/// A dependency a component declares that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingDependency {
    /// Component declaring the dependency.
    pub component: String,

    /// The missing dependency name.
    pub dependency: String,

    /// Whether the declaring component is optional.
    pub component_is_optional: bool,
}

/// Full dependency validation result: every missing dependency and every
/// cycle, collected without failing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// All declared-but-unregistered dependencies.
    pub missing: Vec<MissingDependency>,

    /// All dependency cycles, each as a concrete path.
    pub cycles: Vec<Vec<String>>,
}

impl ValidationReport {
    /// Whether the registry has no dependency problems.
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty() && self.cycles.is_empty()
    }
}
