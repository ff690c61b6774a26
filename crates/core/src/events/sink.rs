//! Session event sink trait, its single-registration slot, and test sinks.

use std::sync::{Arc, Mutex, RwLock};

use super::SessionEvent;

/// Trait for receiving session events.
///
/// `emit()` must be fast and non-blocking: it is called right after the
/// session state changed, from whichever task observed the failure.
pub trait SessionEventSink: Send + Sync {
    fn emit(&self, event: SessionEvent);
}

/// Holds at most one sink. Registering replaces the previous sink, so a
/// remounted shell never receives the same event twice.
#[derive(Default)]
pub struct SessionListenerSlot {
    current: RwLock<Option<Arc<dyn SessionEventSink>>>,
}

impl SessionListenerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `sink`, returning the one it replaced.
    pub fn register(&self, sink: Arc<dyn SessionEventSink>) -> Option<Arc<dyn SessionEventSink>> {
        match self.current.write() {
            Ok(mut current) => current.replace(sink),
            Err(poisoned) => poisoned.into_inner().replace(sink),
        }
    }

    pub fn clear(&self) -> Option<Arc<dyn SessionEventSink>> {
        match self.current.write() {
            Ok(mut current) => current.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.current
            .read()
            .map(|current| current.is_some())
            .unwrap_or(false)
    }

    /// Delivers `event` to the registered sink, if any.
    pub fn emit(&self, event: SessionEvent) {
        let sink = match self.current.read() {
            Ok(current) => current.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        // Emit outside the lock so a sink may re-register.
        if let Some(sink) = sink {
            sink.emit(event);
        }
    }
}

/// No-op implementation for shells that don't react to session events.
#[derive(Clone, Default)]
pub struct NoOpSessionEventSink;

impl SessionEventSink for NoOpSessionEventSink {
    fn emit(&self, _event: SessionEvent) {}
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockSessionEventSink {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl MockSessionEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns the number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Returns true if no events have been collected.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl SessionEventSink for MockSessionEventSink {
    fn emit(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}
