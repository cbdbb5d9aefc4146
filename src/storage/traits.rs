//! Storage trait definitions

use crate::graph::CausalGraph;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Graph not found: {0}")]
    GraphNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Name under which a graph is stored when none is given
pub const DEFAULT_GRAPH: &str = "default";

/// Trait for graph storage backends
///
/// A stored graph is written once by the build pass and read back by the
/// serving process. Implementations must be thread-safe (Send + Sync).
pub trait GraphStore: Send + Sync {
    /// Store a graph under `name`, replacing any previous artifact
    fn save_graph(&self, name: &str, graph: &CausalGraph) -> StorageResult<()>;

    /// Load the graph stored under `name`
    fn load_graph(&self, name: &str) -> StorageResult<Option<CausalGraph>>;

    /// Delete the graph stored under `name`
    fn delete_graph(&self, name: &str) -> StorageResult<bool>;

    /// Names of all stored graphs
    fn list_graphs(&self) -> StorageResult<Vec<String>>;

    /// Load the graph stored under `name`, failing if there is none
    fn require_graph(&self, name: &str) -> StorageResult<CausalGraph> {
        self.load_graph(name)?
            .ok_or_else(|| StorageError::GraphNotFound(name.to_string()))
    }
}

/// Extension trait for opening stores from paths
pub trait OpenStore: GraphStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
