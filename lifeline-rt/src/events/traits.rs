//! Core traits for lifecycle event observation.

// Layer 1: Standard library imports
use std::fmt::Debug;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::Serialize;

// Layer 3: Internal module imports
use super::error::EventSinkError;

/// Event severity levels for filtering and categorization.
///
/// Ordered from lowest to highest severity for filtering purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum EventSeverity {
    /// Trace-level events for detailed debugging
    Trace,
    /// Debug-level events for development
    Debug,
    /// Informational events for normal operations
    Info,
    /// Warning events for potential issues
    Warning,
    /// Error events for failures
    Error,
}

/// Trait for events that can be recorded by an [`EventSink`].
///
/// Provides the static type tag, timestamp, and severity a sink needs to
/// count, filter, and store events without knowing their payloads.
pub trait EventRecord: Send + Sync + Clone + Debug + Serialize + 'static {
    /// Static event type identifier for categorization.
    const EVENT_TYPE: &'static str;

    /// Returns the timestamp when this event occurred.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Returns the severity level of this event.
    fn severity(&self) -> EventSeverity;
}

/// Synchronous sink for lifecycle events.
///
/// Events are emitted synchronously relative to the state transition they
/// describe, so implementations must be fast: count, buffer, or forward,
/// never block. The manager wraps every `record` call in safe-emit, which
/// reports sink failures on the `lifeline::report` tracing target instead of
/// letting them interrupt the operation that produced the event.
///
/// Implementations must be cheaply shareable; the manager stores a sink as
/// `Arc<dyn EventSink<LifecycleEvent>>`.
pub trait EventSink<E: EventRecord>: Send + Sync {
    /// Records a lifecycle event.
    ///
    /// # Errors
    ///
    /// Returns [`EventSinkError::Record`] if the event cannot be recorded.
    fn record(&self, event: E) -> Result<(), EventSinkError>;
}
