//! Type definitions for manager operations: options, codes, and the rich
//! report records every bulk and per-component operation returns.
//!
//! User-code failures are never rethrown; they land in these records (and
//! in lifecycle events) as strings.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

// Layer 3: Internal module imports
use crate::component::StallRecord;
use crate::util::duration_millis;

/// How a shutdown was triggered, retained for attribution until the next
/// successful startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShutdownMethod {
    /// Triggered by SIGINT (or the Ctrl+C / Esc keypresses).
    Sigint,

    /// Triggered by SIGTERM.
    Sigterm,

    /// Triggered by SIGTRAP.
    Sigtrap,

    /// Triggered programmatically.
    Manual,
}

impl ShutdownMethod {
    /// Conventional signal-style name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownMethod::Sigint => "SIGINT",
            ShutdownMethod::Sigterm => "SIGTERM",
            ShutdownMethod::Sigtrap => "SIGTRAP",
            ShutdownMethod::Manual => "manual",
        }
    }
}

impl std::fmt::Display for ShutdownMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived system state, never stored.
///
/// Precedence: `ShuttingDown > Starting > NoComponents > Stalled > Ready >
/// Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemState {
    /// A bulk shutdown is in progress.
    ShuttingDown,

    /// A bulk startup is in progress.
    Starting,

    /// The registry is empty.
    NoComponents,

    /// At least one component is stalled.
    Stalled,

    /// Components are registered but none is running.
    Ready,

    /// At least one component is running.
    Running,
}

/// Answer the manager gives the logger's before-exit hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitAction {
    /// Defer process exit; a shutdown is still in progress.
    Wait,

    /// Nothing in flight; exit may proceed.
    Proceed,
}

// ============================================================================
// Bulk startup
// ============================================================================

/// Options for `start_all_components`.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    /// Global bound override; `None` uses the configured default and
    /// `Some(Duration::ZERO)` disables the bound.
    pub timeout: Option<Duration>,

    /// Proceed even when stalled components exist (they are still skipped).
    pub ignore_stalled: bool,
}

/// Failure codes for `start_all_components`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupCode {
    /// Another bulk startup is already running.
    AlreadyInProgress,

    /// A shutdown is in progress.
    ShutdownInProgress,

    /// The registry is empty.
    NoComponentsRegistered,

    /// Stalled components exist and `ignore_stalled` is not set.
    StalledComponentsExist,

    /// The registry contains a dependency cycle.
    DependencyCycle,

    /// The global startup bound elapsed.
    StartupTimeout,

    /// An unexpected internal failure.
    UnknownError,
}

/// An optional component whose start failed.
#[derive(Debug, Clone, Serialize)]
pub struct FailedOptionalComponent {
    /// Component name.
    pub name: String,

    /// Start error message.
    pub error: String,
}

/// A component skipped because a required dependency was unavailable.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedComponent {
    /// Component name.
    pub name: String,

    /// The dependency that caused the skip.
    pub dependency: String,

    /// Why the dependency was unavailable.
    pub reason: String,
}

/// Outcome of `start_all_components`.
#[derive(Debug, Clone, Serialize)]
pub struct StartupReport {
    /// Whether the startup completed without rollback or precondition
    /// failure.
    pub success: bool,

    /// Components that reached `Running` in this operation.
    pub started_components: Vec<String>,

    /// Optional components whose start failed (tolerated).
    pub failed_optional_components: Vec<FailedOptionalComponent>,

    /// Components skipped because a required dependency failed or was
    /// skipped.
    pub skipped_due_to_dependency: Vec<SkippedComponent>,

    /// Components skipped because they are stalled.
    pub skipped_due_to_stall: Vec<String>,

    /// Stalled components that blocked the startup, when
    /// `code` is `StalledComponentsExist`.
    pub blocked_by_stalled_components: Option<Vec<String>>,

    /// Human-readable failure reason.
    pub reason: Option<String>,

    /// Failure code, when one of the enumerated conditions applies.
    pub code: Option<StartupCode>,

    /// Error detail (e.g. the failing component's error).
    pub error: Option<String>,

    /// Total operation duration.
    #[serde(with = "duration_millis")]
    pub duration: Duration,

    /// Whether the global bound elapsed.
    pub timed_out: bool,
}

impl StartupReport {
    /// Builds an empty failure report.
    pub fn failure(code: StartupCode, reason: impl Into<String>) -> Self {
        Self {
            success: false,
            started_components: Vec::new(),
            failed_optional_components: Vec::new(),
            skipped_due_to_dependency: Vec::new(),
            skipped_due_to_stall: Vec::new(),
            blocked_by_stalled_components: None,
            reason: Some(reason.into()),
            code: Some(code),
            error: None,
            duration: Duration::ZERO,
            timed_out: false,
        }
    }
}

// ============================================================================
// Per-component start/stop
// ============================================================================

/// Options for `start_component`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartComponentOptions {
    /// Start even when required dependencies are not running (diagnostic
    /// restarts).
    pub allow_required_dependencies: bool,
}

/// Failure codes for `start_component`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartCode {
    /// The component is not registered.
    NotFound,

    /// A shutdown is in progress.
    ShutdownInProgress,

    /// A bulk startup is in progress.
    StartupInProgress,

    /// The component is already running.
    AlreadyRunning,

    /// A concurrent start is in flight.
    AlreadyStarting,

    /// The component is stalled.
    ComponentStalled,

    /// A required dependency is not running.
    DependencyNotRunning,

    /// `start()` exceeded the component's startup timeout.
    StartTimeout,

    /// `start()` returned an error.
    StartFailed,
}

/// Outcome of `start_component`.
#[derive(Debug, Clone, Serialize)]
pub struct StartReport {
    /// Whether the component reached `Running`.
    pub success: bool,

    /// Failure code when `success` is false.
    pub code: Option<StartCode>,

    /// Error detail.
    pub error: Option<String>,

    /// Operation duration.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

/// Options for `stop_component`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopComponentOptions {
    /// Per-call override of the graceful timeout.
    pub timeout: Option<Duration>,

    /// Stop even when running components depend on this one.
    pub force: bool,
}

/// Failure codes for `stop_component`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCode {
    /// The component is not registered.
    NotFound,

    /// The component is not running.
    ComponentNotRunning,

    /// The component is stalled.
    ComponentStalled,

    /// A concurrent stop is in flight.
    AlreadyStopping,

    /// Running components depend on this one and `force` was not set.
    HasRunningDependents,

    /// The component stalled during this stop.
    Stalled,
}

/// Outcome of `stop_component`.
#[derive(Debug, Clone, Serialize)]
pub struct StopReport {
    /// Whether the component reached `Stopped`.
    pub success: bool,

    /// Failure code when `success` is false.
    pub code: Option<StopCode>,

    /// Error detail.
    pub error: Option<String>,

    /// Stall details when the stop left the component stalled.
    pub stall: Option<StallRecord>,

    /// Operation duration.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

// ============================================================================
// Bulk shutdown
// ============================================================================

/// Options for `stop_all_components`.
#[derive(Debug, Clone)]
pub struct ShutdownOptions {
    /// Global bound override; `None` uses the configured default and
    /// `Some(Duration::ZERO)` disables the bound.
    pub timeout: Option<Duration>,

    /// Retry stalled components through the force phase.
    pub retry_stalled: bool,

    /// Stop processing after the first stall.
    pub halt_on_stall: bool,
}

impl Default for ShutdownOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            retry_stalled: true,
            halt_on_stall: true,
        }
    }
}

/// Failure codes for `stop_all_components`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownCode {
    /// Another shutdown is already running.
    AlreadyInProgress,

    /// At least one component stalled.
    ComponentStalled,

    /// The global shutdown bound elapsed.
    ShutdownTimeout,
}

/// Outcome of `stop_all_components`.
#[derive(Debug, Clone, Serialize)]
pub struct ShutdownReport {
    /// Whether every targeted component reached `Stopped` in time.
    pub success: bool,

    /// The method that triggered this shutdown.
    pub method: ShutdownMethod,

    /// Components that reached `Stopped` in this operation.
    pub stopped_components: Vec<String>,

    /// Components left stalled, with details.
    pub stalled_components: Vec<StallRecord>,

    /// Human-readable failure reason.
    pub reason: Option<String>,

    /// Failure code when `success` is false.
    pub code: Option<ShutdownCode>,

    /// Total operation duration.
    #[serde(with = "duration_millis")]
    pub duration: Duration,

    /// Whether the global bound elapsed.
    pub timed_out: bool,
}

// ============================================================================
// Unregister
// ============================================================================

/// Options for `unregister_component`.
#[derive(Debug, Clone, Copy)]
pub struct UnregisterOptions {
    /// Stop the component first when it is running.
    pub stop_if_running: bool,
}

impl Default for UnregisterOptions {
    fn default() -> Self {
        Self {
            stop_if_running: true,
        }
    }
}

/// Failure codes for `unregister_component`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnregisterCode {
    /// The component is not registered.
    NotFound,

    /// A bulk startup is in progress.
    StartupInProgress,

    /// A shutdown is in progress.
    ShutdownInProgress,

    /// The pre-unregister stop did not leave the component `Stopped`.
    StopFailed,

    /// The component is stalled and `stop_if_running` was set.
    ComponentStalled,
}

/// Outcome of `unregister_component`.
#[derive(Debug, Clone, Serialize)]
pub struct UnregisterReport {
    /// Whether the component was removed.
    pub success: bool,

    /// Failure code when `success` is false.
    pub code: Option<UnregisterCode>,

    /// Error detail.
    pub error: Option<String>,
}

// ============================================================================
// Messaging
// ============================================================================

/// Options for `send_message_to_component`.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Per-call delivery timeout; `None` uses the configured default.
    pub timeout: Option<Duration>,

    /// Deliver to stopped components too.
    pub include_stopped: bool,

    /// Deliver to stalled components too.
    pub include_stalled: bool,

    /// Sender attribution; the scoped handle fills this automatically.
    pub from: Option<String>,
}

/// Delivery codes for messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendCode {
    /// The handler completed.
    Sent,

    /// The handler exceeded the delivery timeout.
    Timeout,

    /// The handler returned an error (the delivery itself succeeded).
    Error,

    /// The component does not implement `on_message`.
    NoHandler,

    /// The component is not registered.
    NotFound,

    /// The component is not running and `include_stopped` was not set.
    Stopped,

    /// The component is stalled and `include_stalled` was not set.
    Stalled,
}

impl SendCode {
    /// Kebab-case string form, used in lifecycle events.
    pub fn as_str(&self) -> &'static str {
        match self {
            SendCode::Sent => "sent",
            SendCode::Timeout => "timeout",
            SendCode::Error => "error",
            SendCode::NoHandler => "no-handler",
            SendCode::NotFound => "not-found",
            SendCode::Stopped => "stopped",
            SendCode::Stalled => "stalled",
        }
    }
}

/// Outcome of a message delivery.
#[derive(Debug, Clone, Serialize)]
pub struct SendReport {
    /// Whether the handler was invoked and ran to completion (possibly
    /// returning an error).
    pub sent: bool,

    /// Whether the component is registered.
    pub component_found: bool,

    /// Whether the component was running at delivery time.
    pub component_running: bool,

    /// Whether the component implements `on_message`.
    pub handler_implemented: bool,

    /// The handler's return value, if any.
    pub data: Option<Value>,

    /// Handler error message, when `code` is `Error`.
    pub error: Option<String>,

    /// Whether the delivery timed out.
    pub timed_out: bool,

    /// Delivery code.
    pub code: SendCode,
}

impl SendReport {
    /// Builds a non-delivery report for the given code.
    pub fn not_delivered(code: SendCode, component_found: bool, component_running: bool) -> Self {
        Self {
            sent: false,
            component_found,
            component_running,
            handler_implemented: false,
            data: None,
            error: None,
            timed_out: false,
            code,
        }
    }
}

/// Options for `broadcast_message`.
#[derive(Debug, Clone, Default)]
pub struct BroadcastOptions {
    /// Explicit target set; `None` targets every eligible component in
    /// registry order.
    pub component_names: Option<Vec<String>>,

    /// Per-delivery timeout; `None` uses the configured default.
    pub timeout: Option<Duration>,

    /// Deliver to stopped components too.
    pub include_stopped: bool,

    /// Deliver to stalled components too.
    pub include_stalled: bool,

    /// Sender attribution; the scoped handle fills this automatically.
    pub from: Option<String>,
}

/// One broadcast delivery.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastEntry {
    /// Target component.
    pub name: String,

    /// Delivery outcome.
    pub report: SendReport,
}

/// Outcome of `broadcast_message`, in target-iteration order.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastReport {
    /// Per-target outcomes.
    pub deliveries: Vec<BroadcastEntry>,
}

impl BroadcastReport {
    /// Number of deliveries whose handler completed.
    pub fn delivered(&self) -> usize {
        self.deliveries.iter().filter(|d| d.report.sent).count()
    }

    /// Number of deliveries that did not complete.
    pub fn failed(&self) -> usize {
        self.deliveries.len() - self.delivered()
    }
}

// ============================================================================
// Values
// ============================================================================

/// Options for `get_value`.
#[derive(Debug, Clone, Default)]
pub struct ValueOptions {
    /// Requester attribution; the scoped handle fills this automatically.
    pub requested_by: Option<String>,
}

/// Codes for `get_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCode {
    /// The component recognized the key.
    Found,

    /// The component did not recognize the key.
    NotFound,

    /// The component is not running.
    Stopped,

    /// The component is stalled.
    Stalled,

    /// The component does not implement `get_value`.
    NoHandler,

    /// The handler returned an error.
    Error,
}

/// Outcome of `get_value`.
#[derive(Debug, Clone, Serialize)]
pub struct ValueReport {
    /// Whether the component recognized the key.
    pub found: bool,

    /// The value, when found.
    pub value: Option<Value>,

    /// Whether the component is registered.
    pub component_found: bool,

    /// Whether the component was running at lookup time.
    pub component_running: bool,

    /// Whether the component implements `get_value`.
    pub handler_implemented: bool,

    /// Requester attribution.
    pub requested_by: Option<String>,

    /// Lookup code.
    pub code: ValueCode,
}

// ============================================================================
// Health
// ============================================================================

/// Codes for per-component health probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCode {
    /// The probe completed.
    Ok,

    /// The probe exceeded the component's health timeout.
    Timeout,

    /// The probe returned an error.
    Error,

    /// The component has no probe; implicitly healthy.
    NoHandler,

    /// The component is not running.
    Stopped,

    /// The component is stalled.
    Stalled,

    /// The component is not registered.
    NotFound,
}

/// Outcome of a per-component health probe.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Component name.
    pub name: String,

    /// Whether the component is considered healthy.
    pub healthy: bool,

    /// Optional status message from the component.
    pub message: Option<String>,

    /// Optional structured details from the component.
    pub details: Option<Value>,

    /// When the probe ran.
    pub checked_at: DateTime<Utc>,

    /// Probe duration.
    #[serde(with = "duration_millis")]
    pub duration: Duration,

    /// Probe error, when `code` is `Error`.
    pub error: Option<String>,

    /// Whether the probe timed out.
    pub timed_out: bool,

    /// Probe code.
    pub code: HealthCode,
}

/// Overall classification of an aggregate health check.
///
/// Precedence when individual probes disagree: `Error > Timeout > Degraded
/// > Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateHealthCode {
    /// Every probe reported healthy.
    Ok,

    /// Some probe reported unhealthy (excluding `NoHandler` implicit OKs).
    Degraded,

    /// Some probe timed out.
    Timeout,

    /// Some probe errored.
    Error,
}

/// Outcome of `check_all_health`.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateHealthReport {
    /// Whether every individual probe reported healthy.
    pub healthy: bool,

    /// Overall classification.
    pub code: AggregateHealthCode,

    /// Per-component probe outcomes.
    pub components: Vec<HealthReport>,

    /// When the aggregate check ran.
    pub checked_at: DateTime<Utc>,

    /// Total check duration.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

// ============================================================================
// Status queries
// ============================================================================

/// Point-in-time status of a registered component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentStatus {
    /// Component name.
    pub name: String,

    /// Current lifecycle state.
    pub state: crate::component::ComponentState,

    /// Whether the component is optional.
    pub optional: bool,

    /// Declared dependencies.
    pub dependencies: Vec<String>,

    /// When the component last entered `Running`.
    pub started_at: Option<DateTime<Utc>>,

    /// When the component last entered `Stopped`.
    pub stopped_at: Option<DateTime<Utc>>,

    /// Message of the last start/stop error.
    pub last_error: Option<String>,

    /// Stall details, when stalled.
    pub stall: Option<StallRecord>,
}
