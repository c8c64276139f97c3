//! Per-component timeout configuration with sensible defaults.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::util::duration_millis;

/// Default timeout for a component `start()` call (30 seconds)
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for a graceful `stop()` call (5 seconds)
pub const DEFAULT_SHUTDOWN_GRACEFUL_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimum allowed graceful shutdown timeout (1 second)
pub const MIN_SHUTDOWN_GRACEFUL_TIMEOUT: Duration = Duration::from_secs(1);

/// Default timeout for a forced `on_shutdown_force()` call (2 seconds)
pub const DEFAULT_SHUTDOWN_FORCE_TIMEOUT: Duration = Duration::from_secs(2);

/// Minimum allowed force shutdown timeout (500 milliseconds)
pub const MIN_SHUTDOWN_FORCE_TIMEOUT: Duration = Duration::from_millis(500);

/// Default timeout for a `health_check()` probe (5 seconds)
pub const DEFAULT_HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for reload/info/debug signal handlers (5 seconds)
pub const DEFAULT_SIGNAL_TIMEOUT: Duration = Duration::from_secs(5);

/// The five timeouts every component carries.
///
/// Constructors clamp the graceful and force shutdown timeouts to their
/// minimums so a component can never declare a window too small for the
/// shutdown pipeline to act in.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use lifeline_rt::component::ComponentTimeouts;
///
/// let timeouts = ComponentTimeouts::default();
/// assert_eq!(timeouts.startup, Duration::from_secs(30));
/// assert_eq!(timeouts.shutdown_graceful, Duration::from_secs(5));
///
/// // Below-minimum values are clamped.
/// let clamped = ComponentTimeouts::default()
///     .with_shutdown_graceful(Duration::from_millis(10))
///     .with_shutdown_force(Duration::from_millis(10));
/// assert_eq!(clamped.shutdown_graceful, Duration::from_secs(1));
/// assert_eq!(clamped.shutdown_force, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentTimeouts {
    /// Maximum time for `start()` to complete
    #[serde(with = "duration_millis")]
    pub startup: Duration,

    /// Maximum time for a graceful `stop()` (clamped to >= 1s)
    #[serde(with = "duration_millis")]
    pub shutdown_graceful: Duration,

    /// Maximum time for `on_shutdown_force()` (clamped to >= 500ms)
    #[serde(with = "duration_millis")]
    pub shutdown_force: Duration,

    /// Maximum time for `health_check()`
    #[serde(with = "duration_millis")]
    pub health_check: Duration,

    /// Maximum time for reload/info/debug handlers
    #[serde(with = "duration_millis")]
    pub signal: Duration,
}

impl Default for ComponentTimeouts {
    fn default() -> Self {
        Self {
            startup: DEFAULT_STARTUP_TIMEOUT,
            shutdown_graceful: DEFAULT_SHUTDOWN_GRACEFUL_TIMEOUT,
            shutdown_force: DEFAULT_SHUTDOWN_FORCE_TIMEOUT,
            health_check: DEFAULT_HEALTH_CHECK_TIMEOUT,
            signal: DEFAULT_SIGNAL_TIMEOUT,
        }
    }
}

impl ComponentTimeouts {
    /// Sets the startup timeout.
    pub fn with_startup(mut self, timeout: Duration) -> Self {
        self.startup = timeout;
        self
    }

    /// Sets the graceful shutdown timeout, clamped to the 1s minimum.
    pub fn with_shutdown_graceful(mut self, timeout: Duration) -> Self {
        self.shutdown_graceful = timeout.max(MIN_SHUTDOWN_GRACEFUL_TIMEOUT);
        self
    }

    /// Sets the force shutdown timeout, clamped to the 500ms minimum.
    pub fn with_shutdown_force(mut self, timeout: Duration) -> Self {
        self.shutdown_force = timeout.max(MIN_SHUTDOWN_FORCE_TIMEOUT);
        self
    }

    /// Sets the health check timeout.
    pub fn with_health_check(mut self, timeout: Duration) -> Self {
        self.health_check = timeout;
        self
    }

    /// Sets the signal handler timeout.
    pub fn with_signal(mut self, timeout: Duration) -> Self {
        self.signal = timeout;
        self
    }
}
