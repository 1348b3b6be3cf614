//! Error types and result aliases for dsolve operations.
//!
//! `DependencyError` is the contract of the resolver itself: every failure of
//! `register` or `resolve` is one of its three variants and carries the
//! offending key. `DsolveError` covers the ambient layers (manifest parsing,
//! validation, IO) and wraps graph errors raised while loading a manifest.

use std::fmt::Debug;

use thiserror::Error;

/// Failure of a registration or resolution call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError<K, V> {
    /// A completed key was registered again with a different payload
    #[error("Duplicate key {key:?}: already registered as {old:?}, refusing {new:?}")]
    DuplicateKey { key: K, old: V, new: V },

    /// A key was referenced as a dependency but never given a payload
    #[error("Unregistered dependency {key:?}: referenced but never registered")]
    UnregisteredDependency { key: K },

    /// The remaining graph has no node without outstanding dependencies
    #[error("Circular dependency detected at {key:?}: {}", format_cycle(.cycle))]
    CircularDependency {
        /// A member of the cycle
        key: K,
        /// Keys around the cycle, starting and ending at `key`
        cycle: Vec<K>,
    },
}

/// Fieldless discriminant of [`DependencyError`], for comparing error classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyErrorKind {
    DuplicateKey,
    UnregisteredDependency,
    CircularDependency,
}

impl<K, V> DependencyError<K, V> {
    /// The key every variant reports
    pub fn key(&self) -> &K {
        match self {
            DependencyError::DuplicateKey { key, .. }
            | DependencyError::UnregisteredDependency { key }
            | DependencyError::CircularDependency { key, .. } => key,
        }
    }

    /// Error class, independent of the carried keys and values
    pub fn kind(&self) -> DependencyErrorKind {
        match self {
            DependencyError::DuplicateKey { .. } => DependencyErrorKind::DuplicateKey,
            DependencyError::UnregisteredDependency { .. } => {
                DependencyErrorKind::UnregisteredDependency
            },
            DependencyError::CircularDependency { .. } => DependencyErrorKind::CircularDependency,
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> &'static str {
        match self {
            DependencyError::DuplicateKey { .. } => {
                "Register each key once, or re-register it with an equal value"
            },
            DependencyError::UnregisteredDependency { .. } => {
                "Register the missing key before resolving"
            },
            DependencyError::CircularDependency { .. } => {
                "Break the cycle by removing one of its dependency edges"
            },
        }
    }

    /// Convert keys and values, e.g. to owned strings for reporting
    pub fn map<K2, V2>(
        self,
        mut key_fn: impl FnMut(K) -> K2,
        mut value_fn: impl FnMut(V) -> V2,
    ) -> DependencyError<K2, V2> {
        match self {
            DependencyError::DuplicateKey { key, old, new } => DependencyError::DuplicateKey {
                key: key_fn(key),
                old: value_fn(old),
                new: value_fn(new),
            },
            DependencyError::UnregisteredDependency { key } => {
                DependencyError::UnregisteredDependency { key: key_fn(key) }
            },
            DependencyError::CircularDependency { key, cycle } => {
                DependencyError::CircularDependency {
                    key: key_fn(key),
                    cycle: cycle.into_iter().map(key_fn).collect(),
                }
            },
        }
    }
}

/// Format cycle as "a -> b -> a"
pub fn format_cycle<K: Debug>(cycle: &[K]) -> String {
    if cycle.is_empty() {
        return "no cycle".to_string();
    }

    cycle
        .iter()
        .map(|key| format!("{:?}", key))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Unified error type for manifest, configuration and IO operations
#[derive(Error, Debug)]
pub enum DsolveError {
    #[error("Failed to parse TOML manifest: {message}")]
    TomlParse { message: String },

    #[error("Failed to parse JSON manifest: {message}")]
    JsonParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    #[error(transparent)]
    Graph(#[from] DependencyError<String, String>),

    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for dsolve operations
pub type DsolveResult<T> = Result<T, DsolveError>;

impl DsolveError {
    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DsolveError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            DsolveError::TomlParse { .. } | DsolveError::JsonParse { .. } => {
                Some("Check the manifest syntax near the reported location")
            },
            DsolveError::Graph(err) => Some(err.suggestion()),
            DsolveError::Io { .. } => Some("Check that the manifest exists and is readable"),
            DsolveError::ConfigValidation { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_message() {
        let err: DependencyError<&str, &str> = DependencyError::DuplicateKey {
            key: "a",
            old: "A",
            new: "B",
        };

        assert_eq!(
            err.to_string(),
            "Duplicate key \"a\": already registered as \"A\", refusing \"B\""
        );
        assert_eq!(err.key(), &"a");
        assert_eq!(err.kind(), DependencyErrorKind::DuplicateKey);
    }

    #[test]
    fn test_circular_dependency_message() {
        let err: DependencyError<&str, ()> = DependencyError::CircularDependency {
            key: "a",
            cycle: vec!["a", "b", "a"],
        };

        let message = err.to_string();
        assert!(message.contains("\"a\" -> \"b\" -> \"a\""));
        assert_eq!(err.kind(), DependencyErrorKind::CircularDependency);
    }

    #[test]
    fn test_format_cycle() {
        assert_eq!(format_cycle::<u32>(&[]), "no cycle");
        assert_eq!(format_cycle(&[1, 2, 1]), "1 -> 2 -> 1");
    }

    #[test]
    fn test_map_to_owned() {
        let err: DependencyError<&str, u8> = DependencyError::UnregisteredDependency { key: "d" };
        let owned: DependencyError<String, String> = err.map(str::to_string, |v| v.to_string());

        assert_eq!(
            owned,
            DependencyError::UnregisteredDependency { key: "d".to_string() }
        );
    }

    #[test]
    fn test_graph_error_conversion() {
        let graph_err: DependencyError<String, String> = DependencyError::CircularDependency {
            key: "x".to_string(),
            cycle: vec!["x".to_string(), "x".to_string()],
        };
        let err: DsolveError = graph_err.into();

        assert!(matches!(err, DsolveError::Graph(_)));
        assert!(!err.is_recoverable());
        assert_eq!(
            err.suggestion(),
            Some("Break the cycle by removing one of its dependency edges")
        );
    }

    #[test]
    fn test_io_error_is_recoverable() {
        let err = DsolveError::io(
            "read dsolve.toml".to_string(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "IO error: read dsolve.toml");
    }
}
