//! The lifecycle manager: registration, startup/shutdown engines,
//! messaging, health, signal triggers, and the component-scoped handle.
//!
//! # Core Concepts
//!
//! The manager owns the registry and every component record. Bulk engines
//! (startup, shutdown) are mutually exclusive; per-component operations are
//! serialized by the component state machine. All user code the manager
//! awaits is raced against a bounded timer, and a timed-out call keeps
//! running detached so a late completion can never corrupt manager state.
//!
//! Components see the manager only through [`ComponentHandle`], which adds
//! automatic sender attribution to messaging and value lookups.

// Module declarations
pub mod config;
pub mod handle;
pub mod health;
pub mod manager;
pub mod messaging;
pub mod shutdown;
pub mod startup;
pub mod types;

// Re-exports for convenient access
pub use config::{
    ManagerConfig, ManagerConfigBuilder, WarningTimeout, DEFAULT_KEYPRESS_THROTTLE,
    DEFAULT_MESSAGE_TIMEOUT, DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_STARTUP_TIMEOUT,
    DEFAULT_WARNING_TIMEOUT,
};
pub use handle::ComponentHandle;
pub use manager::{LifecycleManager, LifecycleManagerBuilder};
pub use types::{
    AggregateHealthCode, AggregateHealthReport, BroadcastEntry, BroadcastOptions, BroadcastReport,
    ComponentStatus, ExitAction, FailedOptionalComponent, HealthCode, HealthReport, SendCode,
    SendOptions, SendReport, ShutdownCode, ShutdownMethod, ShutdownOptions, ShutdownReport,
    SkippedComponent, StartCode, StartComponentOptions, StartReport, StartupCode, StartupOptions,
    StartupReport, StopCode, StopComponentOptions, StopReport, SystemState, UnregisterCode,
    UnregisterOptions, UnregisterReport, ValueCode, ValueOptions, ValueReport,
};
