//! Query types and result structures

use crate::graph::EntityId;
use thiserror::Error;

/// Direction for edge traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Follow edges from controller to output
    #[default]
    Outgoing,
    /// Follow edges from output back to controller
    Incoming,
    /// Follow edges in both directions
    Both,
}

/// Errors returned by subgraph queries
///
/// An unknown entity is not an error: queries answer it with an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("No path from {from} to {to}")]
    NoPathExists { from: EntityId, to: EntityId },
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Result of a path query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    /// Whether a path was found
    pub found: bool,
    /// Nodes in the path from source to target (inclusive)
    pub path: Vec<EntityId>,
    /// Path length (number of hops)
    pub length: usize,
}

impl PathResult {
    pub fn not_found() -> Self {
        Self {
            found: false,
            path: Vec::new(),
            length: 0,
        }
    }

    pub fn found(path: Vec<EntityId>) -> Self {
        let length = path.len().saturating_sub(1);
        Self {
            found: true,
            path,
            length,
        }
    }

    /// Consecutive (from, to) pairs along the path
    pub fn hops(&self) -> impl Iterator<Item = (&EntityId, &EntityId)> {
        self.path.windows(2).map(|w| (&w[0], &w[1]))
    }
}
