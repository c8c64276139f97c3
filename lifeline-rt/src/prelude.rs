//! Convenience re-exports for the common embedding path.
//!
//! ```rust
//! use lifeline_rt::prelude::*;
//! ```

pub use crate::component::{
    BoxError, Capabilities, Component, ComponentState, ComponentTimeouts, HealthStatus,
    ValueReply,
};
pub use crate::manager::{
    ComponentHandle, LifecycleManager, ManagerConfig, ShutdownMethod, ShutdownOptions,
    StartupOptions, SystemState, WarningTimeout,
};
pub use crate::registry::InsertPosition;
pub use crate::signal::{SignalConfig, SignalCoordinator, SignalHandler};
