//! Error types for signal coordination.

// Layer 1: Standard library imports
use std::io;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors that can occur while attaching or detaching a coordinator.
///
/// Attach failures are unwound: anything installed before the failure is
/// removed again before the error propagates. A raw-mode disable failure is
/// the one exception: ownership is retained so a later detach can retry,
/// and the terminal is restored on process exit regardless.
#[derive(Debug, Error)]
pub enum SignalError {
    /// Installing an OS signal stream failed.
    #[error("Failed to install {signal} handler: {source}")]
    InstallFailed {
        signal: &'static str,
        #[source]
        source: io::Error,
    },

    /// Querying, enabling, or disabling terminal raw mode failed.
    #[error("Raw mode {action} failed: {source}")]
    RawMode {
        action: &'static str,
        #[source]
        source: io::Error,
    },
}

impl SignalError {
    /// Creates an install failure for the named signal.
    pub fn install(signal: &'static str, source: io::Error) -> Self {
        Self::InstallFailed { signal, source }
    }

    /// Creates a raw-mode failure for the named action.
    pub fn raw_mode(action: &'static str, source: io::Error) -> Self {
        Self::RawMode { action, source }
    }

    /// Returns `true` if this is a raw-mode failure.
    pub fn is_raw_mode(&self) -> bool {
        matches!(self, SignalError::RawMode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SignalError::install("SIGHUP", io::Error::other("nope"));
        assert!(err.to_string().contains("SIGHUP"));
        assert!(!err.is_raw_mode());

        let err = SignalError::raw_mode("disable", io::Error::other("tty gone"));
        assert!(err.to_string().contains("disable"));
        assert!(err.is_raw_mode());
    }
}
