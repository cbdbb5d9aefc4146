//! causalkg: Causal Knowledge Graph Builder and Query Engine
//!
//! Builds a directed multigraph of causal relations between grounded
//! biomedical entities from machine-reading extraction rows, then serves
//! subgraph queries over the persisted graph.
//!
//! # Core Concepts
//!
//! - **Extraction rows**: tab-separated event records (controller, input,
//!   output, trigger, label, evidence) read by [`build::RowReader`]
//! - **Edges**: one stored multi-edge per (controller, input, output,
//!   trigger, label), carrying deduplicated evidence and provenance
//! - **Presentation graphs**: renumbered subgraphs returned by the
//!   [`query`] engine
//!
//! # Example
//!
//! ```
//! use causalkg::{BuildConfig, GraphBuilder, GraphEngine};
//!
//! let builder = GraphBuilder::new(BuildConfig::default()).unwrap();
//! let output = builder.build(&[]);
//! let engine = GraphEngine::load(output.graph);
//! assert_eq!(engine.graph().node_count(), 0);
//! ```

pub mod build;
pub mod config;
pub mod graph;
pub mod query;
pub mod storage;

pub use build::{BuildError, BuildOutput, BuildReport, BuildResult, GraphBuilder};
pub use config::{BuildConfig, Config, ConfigError, ImpactMetric, QueryConfig};
pub use graph::{
    CausalEdge, CausalGraph, EdgeKey, Entity, EntityId, EvidenceItem, GraphEngine, Polarity,
};
pub use query::{
    Direction, InteractionQuery, NeighborsQuery, PathQuery, PathResult, PresentationGraph,
    QueryError, QueryResult,
};
pub use storage::{GraphStore, OpenStore, SqliteStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
