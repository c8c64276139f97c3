//! The callback surface a coordinator dispatches into.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::manager::ShutdownMethod;

/// Receiver of the four logical signal events.
///
/// Every dispatch runs through the coordinator's safe wrapper: a panicking
/// handler is reported out-of-band and never corrupts coordinator state.
#[async_trait]
pub trait SignalHandler: Send + Sync {
    /// A shutdown was requested, with the triggering method.
    async fn on_shutdown(&self, method: ShutdownMethod);

    /// A reload was requested.
    async fn on_reload(&self);

    /// Runtime info was requested.
    async fn on_info(&self);

    /// Debug output was requested.
    async fn on_debug(&self);
}
