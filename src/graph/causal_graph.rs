//! CausalGraph: the immutable multigraph artifact produced by a build

use super::edge::CausalEdge;
use super::node::{Entity, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An extracted statistical claim attributed to a document (e.g. a p-value)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificanceRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl SignificanceRecord {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Significance side table: provenance document id → records
pub type SignificanceTable = BTreeMap<String, Vec<SignificanceRecord>>;

/// Metadata about a built graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphMetadata {
    /// When the build pass finished
    pub built_at: Option<DateTime<Utc>>,
    /// Number of extraction rows the build consumed
    pub rows_read: usize,
    /// Rows filtered out before edge construction
    pub rows_excluded: usize,
    /// Rows skipped on a parse or resolution error
    pub rows_skipped: usize,
    /// Accumulated edges discarded at finalization
    pub edges_dropped: usize,
}

/// The causal knowledge graph
///
/// Built once by the construction pipeline, persisted, then loaded read-only.
/// Multiple edges may connect the same ordered node pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CausalGraph {
    pub nodes: BTreeMap<EntityId, Entity>,
    pub edges: Vec<CausalEdge>,
    pub significance: SignificanceTable,
    pub synonyms: BTreeMap<EntityId, Vec<String>>,
    pub metadata: GraphMetadata,
}

impl CausalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &EntityId) -> Option<&Entity> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Display label of a node, falling back to its id
    pub fn label_of<'a>(&'a self, id: &'a EntityId) -> &'a str {
        self.nodes
            .get(id)
            .map(|n| n.label.as_str())
            .unwrap_or(id.as_str())
    }

    pub fn edges(&self) -> impl Iterator<Item = &CausalEdge> {
        self.edges.iter()
    }

    /// Whether `edge` joins two distinct nodes of this graph
    ///
    /// Self-loops and dangling edges stay stored but are never served.
    pub fn serves(&self, edge: &CausalEdge) -> bool {
        !edge.is_self_loop() && self.contains(edge.source()) && self.contains(edge.target())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn synonyms_of(&self, id: &EntityId) -> &[String] {
        self.synonyms.get(id).map(|s| s.as_slice()).unwrap_or(&[])
    }
}
