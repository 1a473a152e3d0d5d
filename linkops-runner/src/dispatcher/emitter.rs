//! Sequence-stamping event emitter

use linkops_core::domain::event::{EventKind, EventLevel, OutputEvent};

use crate::sink::OutputSink;

/// Stamps events with a per-run sequence number and hands them to the sink
pub(crate) struct EventEmitter<'a> {
    sink: &'a dyn OutputSink,
    next_sequence: u64,
}

impl<'a> EventEmitter<'a> {
    pub(crate) fn new(sink: &'a dyn OutputSink) -> Self {
        Self {
            sink,
            next_sequence: 0,
        }
    }

    pub(crate) fn emit(&mut self, kind: EventKind, level: EventLevel, text: String) {
        let event = OutputEvent::new(self.next_sequence, kind, level, text);
        self.next_sequence += 1;
        self.sink.append(event);
    }

    /// Number of events emitted so far
    pub(crate) fn emitted(&self) -> u64 {
        self.next_sequence
    }
}
