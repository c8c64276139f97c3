//! Process-signal coordination: OS signals, TTY keypresses, and shared
//! terminal state.
//!
//! Multiple [`SignalCoordinator`] instances may coexist in one process.
//! stdin and raw mode are process-global, so coordinators share a
//! process-scoped record (attached-instance set, raw-mode owner, keypress
//! pump one-shot flag) and reference-count terminal ownership across
//! attach/detach.

// Module declarations
pub mod coordinator;
pub mod error;
pub mod keys;
pub mod shared;
pub mod traits;

// Re-exports for convenient access
pub use coordinator::{SignalConfig, SignalCoordinator};
pub use error::SignalError;
pub use keys::{decode_key, KeypressAction, KeypressThrottle};
pub use traits::SignalHandler;
