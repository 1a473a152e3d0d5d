//! In-memory transcript
//!
//! Keeps every event of the current run ordered by sequence number. Events
//! that arrive out of order are slotted into place rather than appended.

use linkops_core::domain::event::{OutputEvent, PLACEHOLDER};
use std::sync::{Arc, Mutex};

use super::OutputSink;

/// Thread-safe transcript shared between the dispatcher and a renderer
#[derive(Clone, Default)]
pub struct TranscriptSink {
    events: Arc<Mutex<Vec<OutputEvent>>>,
}

impl TranscriptSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events currently in the transcript, by sequence
    pub fn events(&self) -> Vec<OutputEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Rendered lines; a cleared transcript shows the placeholder
    pub fn lines(&self) -> Vec<String> {
        let events = self.events.lock().unwrap();
        if events.is_empty() {
            return vec![PLACEHOLDER.to_string()];
        }
        events.iter().map(|e| e.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OutputSink for TranscriptSink {
    fn append(&self, event: OutputEvent) {
        let mut events = self.events.lock().unwrap();
        let pos = events.partition_point(|e| e.sequence <= event.sequence);
        events.insert(pos, event);
    }

    fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}
