//! Storage backends for built graphs
//!
//! Graphs are persisted through the `GraphStore` trait. The primary
//! implementation is `SqliteStore`.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{GraphStore, OpenStore, StorageError, StorageResult, DEFAULT_GRAPH};
