//! # lifeline-rt - Component Lifecycle Runtime
//!
//! A lifecycle orchestrator for long-running services: register
//! heterogeneous components, start them in dependency order, stop them in
//! reverse through a graceful-then-force shutdown pipeline, and coordinate
//! process signals, inter-component messaging, shared-value lookups, and
//! health checks.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use lifeline_rt::prelude::*;
//!
//! struct DbPool;
//!
//! #[async_trait]
//! impl Component for DbPool {
//!     fn name(&self) -> &str {
//!         "db-pool"
//!     }
//!
//!     async fn start(&self) -> Result<(), BoxError> {
//!         // open connections...
//!         Ok(())
//!     }
//!
//!     async fn stop(&self) -> Result<(), BoxError> {
//!         // drain and close...
//!         Ok(())
//!     }
//! }
//!
//! struct Api;
//!
//! #[async_trait]
//! impl Component for Api {
//!     fn name(&self) -> &str {
//!         "api"
//!     }
//!
//!     fn dependencies(&self) -> Vec<String> {
//!         vec!["db-pool".into()]
//!     }
//!
//!     async fn start(&self) -> Result<(), BoxError> {
//!         Ok(())
//!     }
//!
//!     async fn stop(&self) -> Result<(), BoxError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = LifecycleManager::new();
//!     manager.register_component(Arc::new(DbPool));
//!     manager.register_component(Arc::new(Api));
//!
//!     // db-pool starts before api; shutdown runs the reverse.
//!     let report = manager.start_all_components(StartupOptions::default()).await;
//!     assert!(report.success);
//!
//!     manager.stop_all_components(ShutdownOptions::default()).await;
//! }
//! ```
//!
//! # Core Concepts
//!
//! ## Components as a capability set
//! The required surface is `name`/`start`/`stop`. Everything else
//! (shutdown warnings, force hooks, signal handlers, health probes,
//! messaging, value lookups) is an optional capability the manager
//! feature-tests before invoking ([`component::Capabilities`]).
//!
//! ## Deterministic ordering
//! Startup order is a stable topological sort over declared dependencies,
//! tie-broken by registration index; registrations that would introduce a
//! cycle are rejected against a trial copy of the registry before anything
//! is committed. Shutdown runs the exact reverse.
//!
//! ## Bounded user code
//! Every call into user code is raced against a timeout. A timed-out call
//! keeps running detached (its eventual result is swallowed), the matching
//! synchronous abort callback fires best-effort, and the operation takes a
//! structured error path. User errors are never rethrown; they surface in
//! report records and lifecycle events.
//!
//! ## Stalls
//! A component that fails both its graceful and force shutdown windows is
//! *stalled*: it blocks later bulk startups until retried or unregistered,
//! and every stall carries a record of the phase and reason.
//!
//! ## Process signals
//! [`signal::SignalCoordinator`] maps `SIGINT`/`SIGTERM`/`SIGTRAP` to
//! shutdown, `SIGHUP` to reload, and `SIGUSR1`/`SIGUSR2` to info/debug,
//! plus TTY keypresses when stdin is a terminal. Coexisting coordinator
//! instances reference-count raw-mode ownership through process-global
//! shared state.
//!
//! # Module Organization
//!
//! - [`component`] - Component trait, capabilities, timeouts, and the
//!   per-component state machine
//! - [`registry`] - Ordered registry, positional insertion, dependency
//!   resolution
//! - [`manager`] - The lifecycle manager and its engines (startup,
//!   shutdown, messaging, health), plus the component-scoped handle
//! - [`signal`] - Process-signal coordination and terminal handling
//! - [`events`] - Typed lifecycle event surface and sinks
//! - [`util`] - Instance IDs and serde helpers

pub mod component;
pub mod events;
pub mod manager;
pub mod prelude;
pub mod registry;
pub mod signal;
pub mod util;

// Re-export commonly used types
pub use component::{
    BoxError, Capabilities, Component, ComponentName, ComponentRecord, ComponentState,
    ComponentTimeouts, HealthStatus, StallPhase, StallReason, StallRecord, ValueReply,
};
pub use events::{
    EventRecord, EventSeverity, EventSink, InMemoryEventSink, LifecycleEvent, LifecycleEventKind,
    NoopEventSink, SinkConfig,
};
pub use manager::{
    AggregateHealthReport, BroadcastOptions, BroadcastReport, ComponentHandle, ComponentStatus,
    ExitAction, HealthReport, LifecycleManager, ManagerConfig, SendOptions, SendReport,
    ShutdownMethod, ShutdownOptions, ShutdownReport, StartupOptions, StartupReport, SystemState,
    ValueOptions, ValueReport, WarningTimeout,
};
pub use registry::{InsertPosition, RegistrationCode, RegistrationReport, ValidationReport};
pub use signal::{SignalConfig, SignalCoordinator, SignalError, SignalHandler};
