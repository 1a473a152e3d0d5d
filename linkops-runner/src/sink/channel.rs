//! Channel-backed sink
//!
//! Forwards events to a renderer task over an unbounded channel so lines can
//! be displayed while the run is still in flight.

use linkops_core::domain::event::OutputEvent;
use tokio::sync::mpsc;
use tracing::debug;

use super::OutputSink;

/// Message delivered to the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkMessage {
    Event(OutputEvent),
    Clear,
}

/// Sink that streams events to a receiver
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkMessage>,
}

impl ChannelSink {
    /// Creates a sink and the receiver a renderer reads from
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, message: SinkMessage) {
        // A dropped renderer must not stall or fail the run
        if self.tx.send(message).is_err() {
            debug!("Renderer gone, dropping transcript output");
        }
    }
}

impl OutputSink for ChannelSink {
    fn append(&self, event: OutputEvent) {
        self.send(SinkMessage::Event(event));
    }

    fn clear(&self) {
        self.send(SinkMessage::Clear);
    }
}
