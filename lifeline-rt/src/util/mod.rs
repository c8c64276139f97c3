//! Utility types and helpers.

pub mod ids;
pub mod serde_helpers;

pub use ids::InstanceId;
pub use serde_helpers::duration_millis;
