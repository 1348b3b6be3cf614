//! Generic dependency resolver
//!
//! Callers register named items together with the names of the items they
//! depend on, in any order, and the resolver drives a callback along a valid
//! resolution order. Forward references are allowed until `resolve` is
//! called; duplicate registrations, missing registrations and cycles are
//! reported as [`DependencyError`] variants.
//!
//! ```
//! use dsolve_resolver::Resolver;
//!
//! let mut resolver = Resolver::new();
//! resolver.register("app", "App", ["db"]).unwrap();
//! resolver.register("db", "Db", []).unwrap();
//!
//! let mut edges = Vec::new();
//! resolver
//!     .resolve(|dependency, dependent| edges.push((*dependency, *dependent)))
//!     .unwrap();
//! assert_eq!(edges, vec![("Db", "App")]);
//! ```

pub mod graph;
pub mod resolver;
pub mod strategy;

// Re-export main types
pub use graph::{DependencyGraph, Node, NodeId};
pub use resolver::Resolver;
pub use strategy::SelectionStrategy;

pub use dsolve_core::{DependencyError, DependencyErrorKind};

/// Result type for resolver operations
pub type ResolverResult<T, K, V> = Result<T, DependencyError<K, V>>;
