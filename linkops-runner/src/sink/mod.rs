//! Output sinks
//!
//! A sink receives the dispatcher's event stream and turns it into a visible
//! transcript. The dispatcher only appends; it never reads sink state.

mod channel;
mod transcript;

pub use channel::{ChannelSink, SinkMessage};
pub use transcript::TranscriptSink;

use linkops_core::domain::event::OutputEvent;

/// Consumer of run output
pub trait OutputSink: Send + Sync {
    /// Appends one event to the transcript
    fn append(&self, event: OutputEvent);

    /// Resets the transcript to its placeholder line
    fn clear(&self);
}
