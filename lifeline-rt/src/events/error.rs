//! Error types for event sinks.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors that can occur while recording or snapshotting events.
///
/// Sink errors never propagate out of lifecycle operations; the manager's
/// safe-emit wrapper reports them out-of-band and continues.
#[derive(Debug, Clone, Error)]
pub enum EventSinkError {
    /// Recording an event failed.
    #[error("Failed to record event: {reason}")]
    Record { reason: String },

    /// Generating a snapshot failed.
    #[error("Failed to snapshot events: {reason}")]
    Snapshot { reason: String },
}

impl EventSinkError {
    /// Creates a record error.
    pub fn record(reason: impl Into<String>) -> Self {
        Self::Record {
            reason: reason.into(),
        }
    }

    /// Creates a snapshot error.
    pub fn snapshot(reason: impl Into<String>) -> Self {
        Self::Snapshot {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EventSinkError::record("buffer poisoned");
        assert!(err.to_string().contains("buffer poisoned"));

        let err = EventSinkError::snapshot("lock poisoned");
        assert!(err.to_string().contains("lock poisoned"));
    }
}
