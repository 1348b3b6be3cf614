//! Node selection strategies for a resolution pass
//!
//! Both strategies produce a valid topological order and notify the
//! dependents of a resolved node in the order their edges were created.
//! They only differ in how independent branches interleave.

use std::fmt;
use std::str::FromStr;

use dsolve_core::DsolveError;
use serde::{Deserialize, Serialize};

/// How the next node to resolve is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    /// Repeatedly scan the pending nodes for the fewest outstanding
    /// dependencies; ties go to the earliest-created node
    LeastOutstanding,
    /// Kahn's algorithm: a FIFO of nodes whose outstanding count reached zero,
    /// seeded in creation order
    #[default]
    ReadyQueue,
}

impl SelectionStrategy {
    pub const ALL: [SelectionStrategy; 2] =
        [SelectionStrategy::LeastOutstanding, SelectionStrategy::ReadyQueue];

    /// Name used in manifests and environment overrides
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::LeastOutstanding => "least-outstanding",
            SelectionStrategy::ReadyQueue => "ready-queue",
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionStrategy {
    type Err = DsolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SelectionStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s.trim())
            .ok_or_else(|| {
                DsolveError::validation(
                    "strategy",
                    format!(
                        "Unknown selection strategy '{}', expected 'least-outstanding' or 'ready-queue'",
                        s
                    ),
                )
            })
    }
}
