//! Graph manifests and resolver configuration for dsolve
//!
//! This crate loads dependency graphs from dsolve.toml and dsolve.json
//! manifests, layers several manifests on top of each other and turns the
//! result into a ready-to-resolve [`dsolve_resolver::Resolver`].

pub mod json;
pub mod merge;
pub mod toml;

// Re-export main types
pub use crate::merge::{ConfigLayering, ConfigLoader, ConfigSource};
pub use crate::toml::{GraphManifest, ItemSpec, ResolverSection};

use dsolve_core::error::DsolveError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, DsolveError>;
