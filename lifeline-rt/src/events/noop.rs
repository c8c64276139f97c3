//! Zero-overhead no-op event sink.

// Layer 1: Standard library imports
use std::marker::PhantomData;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::error::EventSinkError;
use super::traits::{EventRecord, EventSink};

/// Event sink that discards everything.
///
/// The default sink for managers that do not observe lifecycle events;
/// `record` compiles down to nothing.
#[derive(Debug)]
pub struct NoopEventSink<E: EventRecord> {
    _marker: PhantomData<fn() -> E>,
}

impl<E: EventRecord> NoopEventSink<E> {
    /// Creates a new no-op sink.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E: EventRecord> Default for NoopEventSink<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EventRecord> Clone for NoopEventSink<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: EventRecord> EventSink<E> for NoopEventSink<E> {
    fn record(&self, _event: E) -> Result<(), EventSinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::{LifecycleEvent, LifecycleEventKind};

    #[test]
    fn test_noop_discards() {
        let sink = NoopEventSink::<LifecycleEvent>::new();
        let result = sink.record(LifecycleEvent::global(LifecycleEventKind::SignalReload));
        assert!(result.is_ok());
    }
}
