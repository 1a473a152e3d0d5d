//! Service layer
//!
//! Services hold the state behind the operations tab: the selection being
//! built, the dispatcher that runs it and the history of finished runs.

mod history;
mod operations;

pub use history::{OperationHistory, format_duration, format_relative_time};
pub use operations::OperationsService;
