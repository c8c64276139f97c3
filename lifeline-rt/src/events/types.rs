//! Lifecycle event types and sink configuration.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::time::Duration;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::Serialize;

// Layer 3: Internal module imports
use super::traits::{EventRecord, EventSeverity};
use crate::component::{StallPhase, StallReason};
use crate::util::duration_millis;

/// Configuration for event sink behavior.
#[derive(Debug, Clone, Serialize)]
pub struct SinkConfig {
    /// Whether recording is enabled
    pub enabled: bool,

    /// Maximum number of events to keep in history
    pub max_history_size: usize,

    /// Minimum severity level to record (events below this are filtered)
    pub severity_filter: EventSeverity,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history_size: 1000,
            severity_filter: EventSeverity::Trace,
        }
    }
}

/// Snapshot of a sink's state at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct EventSnapshot<E: EventRecord> {
    /// Timestamp when snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Total number of events recorded
    pub total_events: u64,

    /// Number of warning-level events
    pub warning_count: u64,

    /// Number of error-level events
    pub error_count: u64,

    /// Recent events (up to `max_history_size`)
    pub recent_events: Vec<E>,
}

/// A lifecycle event: one observation of the manager's behavior.
///
/// `component` names the affected component for component-scoped events and
/// is `None` for manager-global ones (warning phase, broadcast, signals,
/// aggregate lifecycle).
#[derive(Debug, Clone, Serialize)]
pub struct LifecycleEvent {
    /// Timestamp when the event occurred.
    pub timestamp: DateTime<Utc>,

    /// Affected component, if the event is component-scoped.
    pub component: Option<String>,

    /// Specific lifecycle event type.
    pub kind: LifecycleEventKind,

    /// Additional event metadata.
    pub metadata: HashMap<String, String>,
}

impl LifecycleEvent {
    /// Creates a manager-global event.
    pub fn global(kind: LifecycleEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            component: None,
            kind,
            metadata: HashMap::new(),
        }
    }

    /// Creates a component-scoped event.
    pub fn component(name: impl Into<String>, kind: LifecycleEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            component: Some(name.into()),
            kind,
            metadata: HashMap::new(),
        }
    }
}

impl EventRecord for LifecycleEvent {
    const EVENT_TYPE: &'static str = "lifecycle";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        self.kind.severity()
    }
}

/// Specific types of lifecycle events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LifecycleEventKind {
    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------
    /// A registration was accepted and committed.
    RegistrationAccepted,

    /// A registration was rejected before commit.
    RegistrationRejected {
        /// Failure code (kebab-case).
        code: String,
    },

    /// A component was removed from the registry.
    ComponentUnregistered,

    // ------------------------------------------------------------------
    // Startup
    // ------------------------------------------------------------------
    /// A component's `start()` began.
    ComponentStarting,

    /// A component reached `Running`.
    ComponentStarted {
        /// Time `start()` took.
        #[serde(with = "duration_millis")]
        duration: Duration,
    },

    /// A component's `start()` exceeded its timeout.
    StartTimeout {
        /// The timeout that was exceeded.
        #[serde(with = "duration_millis")]
        timeout: Duration,
    },

    /// A component's `start()` returned an error.
    StartFailed {
        /// Error message.
        error: String,
    },

    /// A previously started component is being stopped to roll back a
    /// failed bulk startup.
    StartupRollback,

    // ------------------------------------------------------------------
    // Warning phase
    // ------------------------------------------------------------------
    /// The global pre-shutdown warning phase began.
    WarningPhaseStarted {
        /// Number of components with a warning hook.
        count: usize,
    },

    /// The global warning phase completed (or was flushed, in
    /// fire-and-forget mode).
    WarningPhaseCompleted {
        /// Time the phase took.
        #[serde(with = "duration_millis")]
        duration: Duration,
    },

    /// The global warning phase timed out with handlers still pending.
    WarningPhaseTimeout {
        /// Components whose handlers had not completed.
        pending: Vec<String>,
    },

    /// A component's warning hook was invoked.
    ShutdownWarning,

    /// A component's warning hook completed.
    ShutdownWarningCompleted {
        /// Time the hook took.
        #[serde(with = "duration_millis")]
        duration: Duration,
    },

    /// A component's warning hook did not complete within the phase bound.
    ShutdownWarningTimeout,

    // ------------------------------------------------------------------
    // Shutdown
    // ------------------------------------------------------------------
    /// A component's graceful `stop()` began.
    ComponentStopping,

    /// A component reached `Stopped`.
    ComponentStopped {
        /// Time the stop took.
        #[serde(with = "duration_millis")]
        duration: Duration,
    },

    /// A component's graceful `stop()` exceeded its timeout.
    StopTimeout {
        /// The timeout that was exceeded.
        #[serde(with = "duration_millis")]
        timeout: Duration,
    },

    /// A component's force hook began.
    ForceStopStarted,

    /// A component's force hook completed.
    ForceStopCompleted {
        /// Time the hook took.
        #[serde(with = "duration_millis")]
        duration: Duration,
    },

    /// A component's force hook exceeded its timeout.
    ForceStopTimeout {
        /// The timeout that was exceeded.
        #[serde(with = "duration_millis")]
        timeout: Duration,
    },

    /// A component failed both shutdown phases and is stalled.
    ComponentStalled {
        /// Phase in which the stall occurred.
        phase: StallPhase,
        /// Why the component stalled.
        reason: StallReason,
    },

    // ------------------------------------------------------------------
    // Messaging & values
    // ------------------------------------------------------------------
    /// A message was delivered to a component's handler.
    MessageSent {
        /// Sending component, `None` for external senders.
        from: Option<String>,
    },

    /// A message could not be delivered.
    MessageFailed {
        /// Sending component, `None` for external senders.
        from: Option<String>,
        /// Failure code (kebab-case).
        code: String,
    },

    /// A broadcast began.
    BroadcastStarted {
        /// Number of targeted components.
        targets: usize,
    },

    /// A broadcast completed.
    BroadcastCompleted {
        /// Deliveries that succeeded.
        delivered: usize,
        /// Deliveries that failed.
        failed: usize,
    },

    /// A shared-value lookup was requested.
    ValueRequested {
        /// Requested key.
        key: String,
        /// Requesting component, `None` for external callers.
        from: Option<String>,
    },

    /// A shared-value lookup returned.
    ValueReturned {
        /// Requested key.
        key: String,
        /// Whether the component recognized the key.
        found: bool,
    },

    // ------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------
    /// A health probe began.
    HealthCheckStarted,

    /// A health probe completed.
    HealthCheckCompleted {
        /// Whether the component reported healthy.
        healthy: bool,
        /// Time the probe took.
        #[serde(with = "duration_millis")]
        duration: Duration,
    },

    /// A health probe failed or timed out.
    HealthCheckFailed {
        /// Error message or timeout description.
        error: String,
    },

    // ------------------------------------------------------------------
    // Signals
    // ------------------------------------------------------------------
    /// A shutdown signal was received.
    SignalShutdown {
        /// Triggering method (SIGINT, SIGTERM, SIGTRAP, manual).
        method: String,
    },

    /// A reload signal was received.
    SignalReload,

    /// An info signal was received.
    SignalInfo,

    /// A debug signal was received.
    SignalDebug,

    // ------------------------------------------------------------------
    // Aggregated manager lifecycle
    // ------------------------------------------------------------------
    /// A bulk startup completed successfully.
    ManagerStarted {
        /// Components started by the operation.
        started: Vec<String>,
    },

    /// A shutdown was initiated.
    ShutdownInitiated {
        /// Triggering method (SIGINT, SIGTERM, SIGTRAP, manual).
        method: String,
    },

    /// A shutdown finished.
    ShutdownCompleted {
        /// Components stopped.
        stopped: usize,
        /// Components left stalled.
        stalled: usize,
        /// Total shutdown duration.
        #[serde(with = "duration_millis")]
        duration: Duration,
    },

    /// The signal coordinator attached.
    SignalsAttached,

    /// The signal coordinator detached.
    SignalsDetached,
}

impl LifecycleEventKind {
    /// Severity of this event kind.
    pub fn severity(&self) -> EventSeverity {
        use LifecycleEventKind::*;
        match self {
            RegistrationAccepted | ComponentUnregistered => EventSeverity::Debug,
            RegistrationRejected { .. } => EventSeverity::Warning,

            ComponentStarting | ComponentStopping | ForceStopStarted => EventSeverity::Debug,
            ComponentStarted { .. } | ComponentStopped { .. } | ForceStopCompleted { .. } => {
                EventSeverity::Info
            }
            StartTimeout { .. } | StopTimeout { .. } | ForceStopTimeout { .. } => {
                EventSeverity::Warning
            }
            StartFailed { .. } => EventSeverity::Error,
            StartupRollback => EventSeverity::Warning,

            WarningPhaseStarted { .. } | ShutdownWarning => EventSeverity::Debug,
            WarningPhaseCompleted { .. } | ShutdownWarningCompleted { .. } => EventSeverity::Debug,
            WarningPhaseTimeout { .. } | ShutdownWarningTimeout => EventSeverity::Warning,

            ComponentStalled { .. } => EventSeverity::Error,

            MessageSent { .. } | BroadcastStarted { .. } | BroadcastCompleted { .. } => {
                EventSeverity::Trace
            }
            MessageFailed { .. } => EventSeverity::Warning,
            ValueRequested { .. } | ValueReturned { .. } => EventSeverity::Trace,

            HealthCheckStarted => EventSeverity::Trace,
            HealthCheckCompleted { healthy, .. } => {
                if *healthy {
                    EventSeverity::Debug
                } else {
                    EventSeverity::Warning
                }
            }
            HealthCheckFailed { .. } => EventSeverity::Warning,

            SignalShutdown { .. } => EventSeverity::Info,
            SignalReload | SignalInfo | SignalDebug => EventSeverity::Info,

            ManagerStarted { .. } | ShutdownInitiated { .. } | ShutdownCompleted { .. } => {
                EventSeverity::Info
            }
            SignalsAttached | SignalsDetached => EventSeverity::Debug,
        }
    }
}
