//! Core graph data structures

mod causal_graph;
mod edge;
mod engine;
mod evidence_index;
mod node;

#[cfg(test)]
mod tests;

pub use causal_graph::{CausalGraph, GraphMetadata, SignificanceRecord, SignificanceTable};
pub use edge::{CausalEdge, EdgeKey, EvidenceItem, Polarity};
pub use engine::GraphEngine;
pub use evidence_index::{EvidenceEntry, EvidenceIndex};
pub use node::{Entity, EntityId, NAMESPACE_SEPARATOR};
