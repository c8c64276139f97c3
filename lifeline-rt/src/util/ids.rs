//! Coordinator instance identities.

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};

// Layer 2: Third-party crate imports
use serde::Serialize;

// Layer 3: Internal module imports
// (none)

/// Identity of one signal-coordinator instance within this process.
///
/// The shared terminal record tracks attached instances and the raw-mode
/// owner by this identity, so it only has to be unique per construction
/// inside a single process. Identities are allocated from a monotonic
/// counter: comparison is a single integer compare, the ordering reflects
/// construction order, and log lines stay short.
///
/// # Example
/// ```rust
/// use lifeline_rt::util::InstanceId;
///
/// let first = InstanceId::allocate();
/// let second = InstanceId::allocate();
/// assert_ne!(first, second);
/// assert!(first < second); // allocation order
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InstanceId(u64);

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(0);

impl InstanceId {
    /// Allocates the next instance identity.
    pub fn allocate() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coordinator-{}", self.0)
    }
}
