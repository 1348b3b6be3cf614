//! # dsolve-core
//!
//! Core types and utilities shared across all dsolve crates.
//!
//! This crate provides:
//! - `Slot`, the set/unset payload of a graph node
//! - `DependencyError`, the error taxonomy of registration and resolution
//! - `DsolveError` for unified handling of config and IO failures
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types
//! - `error`: Error types and result aliases

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{format_cycle, DependencyError, DependencyErrorKind, DsolveError, DsolveResult};
pub use types::Slot;
