//! Component lifecycle state machine and per-component state record.
//!
//! Provides the state enum, stall bookkeeping, and the record the manager
//! keeps for every registered component.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// Component state in the lifecycle state machine.
///
/// # State Transitions
///
/// ```text
/// Registered ─start→ Starting ─ok→ Running
///                       └─timeout/err→ Failed → Registered (reset)
/// Running ─stop→ Stopping ─ok→ Stopped
///                       └─timeout/err→ ForceStopping ─ok→ Stopped
///                                                    └─err/timeout→ Stalled
/// ```
///
/// # Examples
///
/// ```rust
/// use lifeline_rt::component::ComponentState;
///
/// let state = ComponentState::Registered;
/// assert!(!state.is_running());
/// assert!(ComponentState::Stalled.is_stalled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentState {
    /// Registered but not started.
    Registered,

    /// `start()` in progress.
    Starting,

    /// Started and operational.
    Running,

    /// Graceful `stop()` in progress.
    Stopping,

    /// Forced shutdown (`on_shutdown_force`) in progress.
    ForceStopping,

    /// Stopped cleanly.
    Stopped,

    /// Failed to stop within both the graceful and force windows.
    Stalled,

    /// `start()` failed; transient state before the reset to `Registered`.
    Failed,
}

impl Default for ComponentState {
    fn default() -> Self {
        Self::Registered
    }
}

impl ComponentState {
    /// Returns `true` if the component is running.
    pub fn is_running(&self) -> bool {
        matches!(self, ComponentState::Running)
    }

    /// Returns `true` if the component is stalled.
    pub fn is_stalled(&self) -> bool {
        matches!(self, ComponentState::Stalled)
    }

    /// Returns `true` if the component is in a transitional state.
    ///
    /// Transitional states reject re-entry: a `Starting` component rejects a
    /// concurrent start, a `Stopping`/`ForceStopping` component rejects a
    /// concurrent stop.
    pub fn is_transitional(&self) -> bool {
        matches!(
            self,
            ComponentState::Starting | ComponentState::Stopping | ComponentState::ForceStopping
        )
    }

    /// Returns `true` if a start may begin from this state.
    pub fn can_start(&self) -> bool {
        matches!(
            self,
            ComponentState::Registered | ComponentState::Stopped | ComponentState::Failed
        )
    }
}

/// The shutdown phase in which a component stalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StallPhase {
    /// The graceful `stop()` phase.
    Graceful,

    /// The forced `on_shutdown_force()` phase.
    Force,
}

/// Why a component stalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StallReason {
    /// The phase exceeded its timeout.
    Timeout,

    /// The phase returned an error.
    Error,

    /// The graceful phase timed out and the force phase also failed.
    Both,
}

/// Stall details, present on a record iff the component state is `Stalled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StallRecord {
    /// Name of the stalled component.
    pub name: String,

    /// Phase in which the stall occurred.
    pub phase: StallPhase,

    /// Why the component stalled.
    pub reason: StallReason,

    /// When the stop attempt began.
    pub started_at: DateTime<Utc>,

    /// When the stall was recorded.
    pub stalled_at: DateTime<Utc>,

    /// Error message from the failing phase, if any.
    pub error: Option<String>,
}

/// Per-component state record owned by the manager.
///
/// Tracks the current state, lifecycle timestamps, the last error observed,
/// and stall details. Mutators keep the record's invariants: `Running`
/// implies `started_at` is set, `Stopped` implies `stopped_at` is set, and a
/// stall record exists iff the state is `Stalled`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Current lifecycle state.
    pub state: ComponentState,

    /// When the component last entered `Running`.
    pub started_at: Option<DateTime<Utc>>,

    /// When the component last entered `Stopped`.
    pub stopped_at: Option<DateTime<Utc>>,

    /// Message of the last start/stop error, if any.
    pub last_error: Option<String>,

    /// Stall details; present iff `state` is `Stalled`.
    pub stall: Option<StallRecord>,
}

impl ComponentRecord {
    /// Creates a record in the `Registered` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `Starting`.
    pub fn mark_starting(&mut self) {
        self.state = ComponentState::Starting;
    }

    /// Enters `Running` and stamps `started_at`.
    pub fn mark_running(&mut self) {
        self.state = ComponentState::Running;
        self.started_at = Some(Utc::now());
        self.last_error = None;
    }

    /// Records a start failure and resets the record to `Registered`.
    ///
    /// The transient `Failed` state is observable through the emitted
    /// lifecycle event; the record itself lands back on `Registered` so the
    /// component can be started again.
    pub fn mark_start_failed(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
        self.state = ComponentState::Registered;
    }

    /// Records an optional-component start failure, leaving the state on
    /// `Failed` for the remainder of the bulk operation.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
        self.state = ComponentState::Failed;
    }

    /// Enters `Stopping`.
    pub fn mark_stopping(&mut self) {
        self.state = ComponentState::Stopping;
    }

    /// Enters `ForceStopping`.
    pub fn mark_force_stopping(&mut self) {
        self.state = ComponentState::ForceStopping;
    }

    /// Enters `Stopped`, stamps `stopped_at`, and clears any stall record.
    pub fn mark_stopped(&mut self) {
        self.state = ComponentState::Stopped;
        self.stopped_at = Some(Utc::now());
        self.stall = None;
    }

    /// Enters `Stalled` with the given stall details.
    pub fn mark_stalled(&mut self, stall: StallRecord) {
        if let Some(error) = &stall.error {
            self.last_error = Some(error.clone());
        }
        self.state = ComponentState::Stalled;
        self.stall = Some(stall);
    }
}
