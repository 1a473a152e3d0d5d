//! LinkOps Runner
//!
//! Executes batches of scripts against sets of target machines and streams
//! an ordered transcript of what happened.
//!
//! Architecture:
//! - Configuration: probe selection and timing, from environment or defaults
//! - Probes: the capability that runs one script on one target
//! - Dispatcher: sequential scripts, concurrent targets, ordered results
//! - Sinks: where transcript events go (in-memory or a live channel)
//! - Services: the operations controller and the run history

pub mod config;
pub mod dispatcher;
pub mod probe;
pub mod service;
pub mod sink;

pub use config::{Config, ProbeKind};
pub use dispatcher::{DispatcherState, ExecutionDispatcher};
pub use probe::TargetProbe;
pub use service::{OperationHistory, OperationsService};
pub use sink::OutputSink;
