//! Manager configuration with sensible defaults.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::Serialize;

// Layer 3: Internal module imports
use crate::util::duration_millis;

/// Default global timeout for a bulk startup (30 seconds)
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default global timeout for a bulk shutdown (30 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound for the global shutdown warning phase (500 milliseconds)
pub const DEFAULT_WARNING_TIMEOUT: Duration = Duration::from_millis(500);

/// Default timeout for message delivery (5 seconds)
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default leading-edge keypress throttle window (200 milliseconds)
pub const DEFAULT_KEYPRESS_THROTTLE: Duration = Duration::from_millis(200);

/// Policy for the global pre-shutdown warning phase.
///
/// Mirrors the three regimes of the warning bound: skip the phase, launch
/// the handlers without waiting (one scheduler tick is flushed before the
/// global completion event, so tests observe a deterministic ordering), or
/// await them under a global bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "timeout", rename_all = "kebab-case")]
pub enum WarningTimeout {
    /// Do not run the warning phase at all.
    Skip,

    /// Launch all handlers and move on; completions are observed
    /// asynchronously.
    FireAndForget,

    /// Await all handlers, bounded by the given duration.
    Bounded(#[serde(with = "duration_millis")] Duration),
}

impl Default for WarningTimeout {
    fn default() -> Self {
        Self::Bounded(DEFAULT_WARNING_TIMEOUT)
    }
}

/// Manager-wide configuration.
///
/// A zero duration disables the corresponding global timeout.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use lifeline_rt::manager::{ManagerConfig, WarningTimeout};
///
/// let config = ManagerConfig::default();
/// assert_eq!(config.startup_timeout, Duration::from_secs(30));
///
/// let config = ManagerConfig::builder()
///     .with_shutdown_timeout(Duration::from_secs(10))
///     .with_warning_timeout(WarningTimeout::FireAndForget)
///     .with_attach_signals_on_start(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.shutdown_timeout, Duration::from_secs(10));
/// assert!(config.attach_signals_on_start);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ManagerConfig {
    /// Global bound for `start_all_components`; zero disables.
    #[serde(with = "duration_millis")]
    pub startup_timeout: Duration,

    /// Global bound for `stop_all_components`; zero disables.
    #[serde(with = "duration_millis")]
    pub shutdown_timeout: Duration,

    /// Warning-phase policy.
    pub warning_timeout: WarningTimeout,

    /// Default bound for message delivery.
    #[serde(with = "duration_millis")]
    pub message_timeout: Duration,

    /// Attach the signal coordinator when the first component starts.
    pub attach_signals_on_start: bool,

    /// Leading-edge throttle window for TTY keypress actions; zero disables.
    #[serde(with = "duration_millis")]
    pub keypress_throttle: Duration,

    /// Answer `wait` from the before-exit hook while a shutdown runs.
    pub enable_logger_exit_hook: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            warning_timeout: WarningTimeout::default(),
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
            attach_signals_on_start: false,
            keypress_throttle: DEFAULT_KEYPRESS_THROTTLE,
            enable_logger_exit_hook: false,
        }
    }
}

impl ManagerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ManagerConfigBuilder {
        ManagerConfigBuilder::default()
    }

    /// Validate configuration values.
    ///
    /// Returns `Err` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.message_timeout.is_zero() {
            return Err("message_timeout must be > 0".to_string());
        }
        if let WarningTimeout::Bounded(d) = self.warning_timeout {
            if d.is_zero() {
                return Err(
                    "warning_timeout bound must be > 0 (use FireAndForget for zero)".to_string(),
                );
            }
        }
        Ok(())
    }
}

/// Builder for [`ManagerConfig`] with fluent API.
#[derive(Debug, Clone, Default)]
pub struct ManagerConfigBuilder {
    config: ManagerConfig,
}

impl ManagerConfigBuilder {
    /// Sets the global startup timeout; zero disables.
    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.config.startup_timeout = timeout;
        self
    }

    /// Sets the global shutdown timeout; zero disables.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Sets the warning-phase policy.
    pub fn with_warning_timeout(mut self, policy: WarningTimeout) -> Self {
        self.config.warning_timeout = policy;
        self
    }

    /// Sets the default message delivery timeout.
    pub fn with_message_timeout(mut self, timeout: Duration) -> Self {
        self.config.message_timeout = timeout;
        self
    }

    /// Attach the signal coordinator when the first component starts.
    pub fn with_attach_signals_on_start(mut self, enabled: bool) -> Self {
        self.config.attach_signals_on_start = enabled;
        self
    }

    /// Sets the keypress throttle window; zero disables throttling.
    pub fn with_keypress_throttle(mut self, window: Duration) -> Self {
        self.config.keypress_throttle = window;
        self
    }

    /// Enables the logger before-exit hook.
    pub fn with_logger_exit_hook(mut self, enabled: bool) -> Self {
        self.config.enable_logger_exit_hook = enabled;
        self
    }

    /// Validates and produces the configuration.
    ///
    /// # Errors
    ///
    /// Returns the validation message for an invalid configuration.
    pub fn build(self) -> Result<ManagerConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.startup_timeout, DEFAULT_STARTUP_TIMEOUT);
        assert_eq!(config.shutdown_timeout, DEFAULT_SHUTDOWN_TIMEOUT);
        assert_eq!(
            config.warning_timeout,
            WarningTimeout::Bounded(DEFAULT_WARNING_TIMEOUT)
        );
        assert_eq!(config.message_timeout, DEFAULT_MESSAGE_TIMEOUT);
        assert!(!config.attach_signals_on_start);
        assert!(!config.enable_logger_exit_hook);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_builder() {
        let config = ManagerConfig::builder()
            .with_startup_timeout(Duration::from_secs(5))
            .with_warning_timeout(WarningTimeout::Skip)
            .with_logger_exit_hook(true)
            .build()
            .unwrap();
        assert_eq!(config.startup_timeout, Duration::from_secs(5));
        assert_eq!(config.warning_timeout, WarningTimeout::Skip);
        assert!(config.enable_logger_exit_hook);
    }

    #[test]
    fn test_zero_message_timeout_rejected() {
        let result = ManagerConfig::builder()
            .with_message_timeout(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_bounded_warning_rejected() {
        let result = ManagerConfig::builder()
            .with_warning_timeout(WarningTimeout::Bounded(Duration::ZERO))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_global_timeouts_allowed() {
        // Zero means "disabled" for the global bounds.
        let result = ManagerConfig::builder()
            .with_startup_timeout(Duration::ZERO)
            .with_shutdown_timeout(Duration::ZERO)
            .build();
        assert!(result.is_ok());
    }
}
