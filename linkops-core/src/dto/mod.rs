//! Data Transfer Objects for the agent gateway
//!
//! DTOs exchanged with the agent gateway that performs script runs on
//! enrolled machines. They are lightweight and carry only what the
//! gateway needs.

pub mod script_run;
