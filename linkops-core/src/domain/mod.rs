//! Core domain types
//!
//! This module contains the core domain structures used across LinkOps crates.
//! They are shared between the runner (for execution) and the CLI (for display).

pub mod event;
pub mod operation;
pub mod outcome;
pub mod run;
pub mod script;
pub mod selection;
pub mod target;
