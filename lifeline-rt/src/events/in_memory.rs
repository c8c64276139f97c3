//! In-memory event sink with lock-free atomic counters.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

// Layer 2: Third-party crate imports
use chrono::Utc;

// Layer 3: Internal module imports
use super::error::EventSinkError;
use super::traits::{EventRecord, EventSeverity, EventSink};
use super::types::{EventSnapshot, SinkConfig};

/// In-memory event sink with atomic counters and a bounded ring buffer.
///
/// Counters are lock-free; the history ring buffer sits behind an `RwLock`
/// (reads dominate once a system is running). Cloning is cheap: clones share
/// the same inner state.
///
/// # Examples
///
/// ```rust
/// use lifeline_rt::events::{
///     EventSink, InMemoryEventSink, LifecycleEvent, LifecycleEventKind, SinkConfig,
/// };
///
/// let sink = InMemoryEventSink::new(SinkConfig::default());
/// sink.record(LifecycleEvent::global(LifecycleEventKind::SignalReload)).unwrap();
///
/// let snapshot = sink.snapshot().unwrap();
/// assert_eq!(snapshot.total_events, 1);
/// ```
#[derive(Debug)]
pub struct InMemoryEventSink<E: EventRecord> {
    inner: Arc<InMemorySinkInner<E>>,
}

#[derive(Debug)]
struct InMemorySinkInner<E: EventRecord> {
    config: SinkConfig,

    // Lock-free atomic counters for concurrent access
    total_events: AtomicU64,
    warning_count: AtomicU64,
    error_count: AtomicU64,

    // Ring buffer for event history
    history: RwLock<VecDeque<E>>,
}

impl<E: EventRecord> InMemoryEventSink<E> {
    /// Creates a new in-memory sink with the given configuration.
    pub fn new(config: SinkConfig) -> Self {
        Self {
            inner: Arc::new(InMemorySinkInner {
                config,
                total_events: AtomicU64::new(0),
                warning_count: AtomicU64::new(0),
                error_count: AtomicU64::new(0),
                history: RwLock::new(VecDeque::new()),
            }),
        }
    }

    /// Generates a snapshot of the current sink state.
    ///
    /// # Errors
    ///
    /// Returns [`EventSinkError::Snapshot`] if the history lock is poisoned.
    pub fn snapshot(&self) -> Result<EventSnapshot<E>, EventSinkError> {
        let history = self
            .inner
            .history
            .read()
            .map_err(|e| EventSinkError::snapshot(format!("Failed to acquire read lock: {e}")))?;

        Ok(EventSnapshot {
            timestamp: Utc::now(),
            total_events: self.inner.total_events.load(Ordering::Relaxed),
            warning_count: self.inner.warning_count.load(Ordering::Relaxed),
            error_count: self.inner.error_count.load(Ordering::Relaxed),
            recent_events: history.iter().cloned().collect(),
        })
    }
}

impl<E: EventRecord> Clone for InMemoryEventSink<E> {
    /// Cheap clone sharing the same inner state.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: EventRecord> EventSink<E> for InMemoryEventSink<E> {
    fn record(&self, event: E) -> Result<(), EventSinkError> {
        // Early return if recording is disabled
        if !self.inner.config.enabled {
            return Ok(());
        }

        let severity = event.severity();

        // Early return if below severity threshold
        if severity < self.inner.config.severity_filter {
            return Ok(());
        }

        self.inner.total_events.fetch_add(1, Ordering::Relaxed);
        match severity {
            EventSeverity::Warning => {
                self.inner.warning_count.fetch_add(1, Ordering::Relaxed);
            }
            EventSeverity::Error => {
                self.inner.error_count.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }

        let mut history = self
            .inner
            .history
            .write()
            .map_err(|e| EventSinkError::record(format!("Failed to acquire write lock: {e}")))?;

        // Enforce ring buffer size limit
        if history.len() >= self.inner.config.max_history_size {
            history.pop_front();
        }

        history.push_back(event);

        Ok(())
    }
}
