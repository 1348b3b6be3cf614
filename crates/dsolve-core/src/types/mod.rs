//! Core data types for dsolve.
//!
//! This module provides the fundamental types used throughout the dsolve crates:
//! - `Slot`, the payload of a graph node that may still be a placeholder

pub mod slot;

// Re-export all public types
pub use slot::Slot;
