//! Change notifications
//!
//! The store emits a [`StoreEvent`] after each mutation that changed the
//! collection. Presentation code registers a [`ChangeSink`] to refresh its
//! views instead of polling the store.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Facts about collection changes, emitted after the change is persisted
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// The collection was (re)loaded from storage
    Loaded { count: usize },
    /// A new asset was appended
    Added { id: Uuid },
    /// An existing asset was replaced in place
    Updated { id: Uuid },
    /// An asset was removed
    Deleted { id: Uuid },
}

/// Receiver for store change events
///
/// `emit()` runs synchronously inside the mutating call, so implementations
/// should return quickly and must not call back into the store.
pub trait ChangeSink: Send {
    fn emit(&self, event: &StoreEvent);
}

impl<F> ChangeSink for F
where
    F: Fn(&StoreEvent) + Send,
{
    fn emit(&self, event: &StoreEvent) {
        self(event)
    }
}

/// Sink that collects every event it receives
///
/// Clones share the same buffer.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<StoreEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl ChangeSink for RecordingSink {
    fn emit(&self, event: &StoreEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_recording_sink_collects_events() {
        let sink = RecordingSink::new();
        let id = Uuid::new_v4();

        sink.emit(&StoreEvent::Added { id });
        sink.emit(&StoreEvent::Deleted { id });
        assert_eq!(
            sink.events(),
            vec![StoreEvent::Added { id }, StoreEvent::Deleted { id }]
        );

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_recording_sink_clones_share_buffer() {
        let sink = RecordingSink::new();
        let other = sink.clone();

        other.emit(&StoreEvent::Loaded { count: 3 });
        assert_eq!(sink.events(), vec![StoreEvent::Loaded { count: 3 }]);
    }

    #[test]
    fn test_closure_sink() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sink = move |_: &StoreEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        };

        sink.emit(&StoreEvent::Loaded { count: 0 });
        sink.emit(&StoreEvent::Loaded { count: 1 });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(StoreEvent::Loaded { count: 2 }).unwrap();
        assert_eq!(json["type"], "loaded");
        assert_eq!(json["count"], 2);
    }
}
