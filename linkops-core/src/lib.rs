//! LinkOps Core
//!
//! Core types and abstractions for the LinkOps operations dispatcher.
//!
//! This crate contains:
//! - Domain types: scripts, targets, the selection, runs, events and outcomes
//! - Catalog and roster: the static registries a selection is validated against
//! - DTOs: Data transfer objects for the agent gateway
//! - Errors: the operation error taxonomy

pub mod catalog;
pub mod domain;
pub mod dto;
pub mod error;
pub mod roster;

pub use catalog::ScriptCatalog;
pub use error::{CatalogError, OperationError};
pub use roster::TargetRoster;
