//! The `Component` trait: lifecycle interface plus optional capabilities.
//!
//! Components are modeled as a capability set. The required surface is
//! `name`/`start`/`stop`; everything else is an optional hook the manager
//! invokes only when the component's [`Capabilities`] advertise it. This is
//! the trait-object analogue of a struct of nullable function pointers:
//! a `false` flag means "not implemented" and the default body is never run.

// Layer 1: Standard library imports
use std::error::Error;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Layer 3: Internal module imports
use super::timeouts::ComponentTimeouts;
use crate::manager::ComponentHandle;

/// Boxed error type carried out of user code.
///
/// The manager never rethrows these; they are captured into report records
/// and lifecycle events.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Capability flags a component advertises.
///
/// The manager feature-tests a capability before invoking the corresponding
/// hook; hooks whose flag is `false` are treated as not implemented (e.g.
/// messaging reports `no_handler`, health reports an implicit OK).
///
/// # Examples
///
/// ```rust
/// use lifeline_rt::component::Capabilities;
///
/// let caps = Capabilities::none()
///     .with_health_check()
///     .with_on_message();
/// assert!(caps.health_check);
/// assert!(caps.on_message);
/// assert!(!caps.on_shutdown_force);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Synchronous notification when `start()` is abandoned on timeout.
    pub on_startup_aborted: bool,

    /// Synchronous notification when a graceful `stop()` is abandoned.
    pub on_stop_aborted: bool,

    /// Pre-shutdown warning hook.
    pub on_shutdown_warning: bool,

    /// Forced-shutdown hook, run when graceful stop fails.
    pub on_shutdown_force: bool,

    /// Synchronous notification when the force hook is abandoned.
    pub on_shutdown_force_aborted: bool,

    /// Reload signal handler.
    pub on_reload: bool,

    /// Info signal handler.
    pub on_info: bool,

    /// Debug signal handler.
    pub on_debug: bool,

    /// Health probe.
    pub health_check: bool,

    /// Point-to-point / broadcast message handler.
    pub on_message: bool,

    /// Synchronous shared-value lookup.
    pub get_value: bool,
}

impl Capabilities {
    /// No capabilities; the component only implements `start`/`stop`.
    pub fn none() -> Self {
        Self::default()
    }

    /// Advertises `on_startup_aborted`.
    pub fn with_on_startup_aborted(mut self) -> Self {
        self.on_startup_aborted = true;
        self
    }

    /// Advertises `on_stop_aborted`.
    pub fn with_on_stop_aborted(mut self) -> Self {
        self.on_stop_aborted = true;
        self
    }

    /// Advertises `on_shutdown_warning`.
    pub fn with_on_shutdown_warning(mut self) -> Self {
        self.on_shutdown_warning = true;
        self
    }

    /// Advertises `on_shutdown_force`.
    pub fn with_on_shutdown_force(mut self) -> Self {
        self.on_shutdown_force = true;
        self
    }

    /// Advertises `on_shutdown_force_aborted`.
    pub fn with_on_shutdown_force_aborted(mut self) -> Self {
        self.on_shutdown_force_aborted = true;
        self
    }

    /// Advertises `on_reload`.
    pub fn with_on_reload(mut self) -> Self {
        self.on_reload = true;
        self
    }

    /// Advertises `on_info`.
    pub fn with_on_info(mut self) -> Self {
        self.on_info = true;
        self
    }

    /// Advertises `on_debug`.
    pub fn with_on_debug(mut self) -> Self {
        self.on_debug = true;
        self
    }

    /// Advertises `health_check`.
    pub fn with_health_check(mut self) -> Self {
        self.health_check = true;
        self
    }

    /// Advertises `on_message`.
    pub fn with_on_message(mut self) -> Self {
        self.on_message = true;
        self
    }

    /// Advertises `get_value`.
    pub fn with_get_value(mut self) -> Self {
        self.get_value = true;
        self
    }
}

/// Health probe result.
///
/// A bare `true`/`false` from user code normalizes through
/// [`HealthStatus::from`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Whether the component considers itself healthy.
    pub healthy: bool,

    /// Optional human-readable status message.
    pub message: Option<String>,

    /// Optional structured details.
    pub details: Option<Value>,
}

impl HealthStatus {
    /// A healthy status with no message.
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            message: None,
            details: None,
        }
    }

    /// An unhealthy status with a message.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            message: Some(message.into()),
            details: None,
        }
    }

    /// Attaches structured details.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<bool> for HealthStatus {
    fn from(healthy: bool) -> Self {
        Self {
            healthy,
            message: None,
            details: None,
        }
    }
}

/// Result of a component's `get_value` lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueReply {
    /// Whether the component recognizes the key.
    pub found: bool,

    /// The value, when found.
    pub value: Option<Value>,
}

impl ValueReply {
    /// A successful lookup.
    pub fn found(value: Value) -> Self {
        Self {
            found: true,
            value: Some(value),
        }
    }

    /// An unrecognized key.
    pub fn not_found() -> Self {
        Self {
            found: false,
            value: None,
        }
    }
}

/// Lifecycle interface for managed components.
///
/// The required surface is `name`, `start`, and `stop`; declared data
/// (`dependencies`, `optional`, `timeouts`) and every optional hook have
/// defaults. The manager stores components as `Arc<dyn Component>`, so all
/// methods take `&self`; components keep mutable state behind their own
/// interior mutability.
///
/// Optional hooks are invoked only when [`Component::capabilities`]
/// advertises them. The three `*_aborted` callbacks are synchronous and must
/// not block: they fire on the manager's timeout path, best-effort, and the
/// manager does not wait on them.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use lifeline_rt::component::{BoxError, Capabilities, Component};
///
/// struct DbPool;
///
/// #[async_trait]
/// impl Component for DbPool {
///     fn name(&self) -> &str {
///         "db-pool"
///     }
///
///     async fn start(&self) -> Result<(), BoxError> {
///         Ok(())
///     }
///
///     async fn stop(&self) -> Result<(), BoxError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Component: Send + Sync {
    /// The component's unique, lowercase kebab-case name.
    fn name(&self) -> &str;

    /// Names of components that must be `Running` before this one starts.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether a startup failure of this component is tolerated (no
    /// rollback, dependents are not blocked).
    fn optional(&self) -> bool {
        false
    }

    /// The component's timeout configuration.
    fn timeouts(&self) -> ComponentTimeouts {
        ComponentTimeouts::default()
    }

    /// Which optional hooks this component implements.
    fn capabilities(&self) -> Capabilities {
        Capabilities::none()
    }

    /// Starts the component.
    async fn start(&self) -> Result<(), BoxError>;

    /// Stops the component gracefully.
    async fn stop(&self) -> Result<(), BoxError>;

    /// Receives the scoped handle at registration time.
    ///
    /// Components that interact with the manager store the handle; the
    /// default drops it.
    fn attach_handle(&self, handle: ComponentHandle) {
        let _ = handle;
    }

    /// Synchronous notification that a timed-out `start()` was abandoned.
    fn on_startup_aborted(&self) {}

    /// Synchronous notification that a timed-out `stop()` was abandoned.
    fn on_stop_aborted(&self) {}

    /// Synchronous notification that a timed-out force hook was abandoned.
    fn on_shutdown_force_aborted(&self) {}

    /// Pre-shutdown warning, invoked during the global warning phase.
    async fn on_shutdown_warning(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Forced-shutdown hook, invoked after a failed graceful stop.
    async fn on_shutdown_force(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Reload signal handler.
    async fn on_reload(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Info signal handler.
    async fn on_info(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Debug signal handler.
    async fn on_debug(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Health probe.
    async fn health_check(&self) -> Result<HealthStatus, BoxError> {
        Ok(HealthStatus::healthy())
    }

    /// Message handler. `from` is the sending component's name, or `None`
    /// for external senders.
    async fn on_message(&self, payload: Value, from: Option<String>) -> Result<Option<Value>, BoxError> {
        let _ = (payload, from);
        Ok(None)
    }

    /// Synchronous shared-value lookup.
    fn get_value(&self, key: &str, from: Option<&str>) -> Result<ValueReply, BoxError> {
        let _ = (key, from);
        Ok(ValueReply::not_found())
    }
}
