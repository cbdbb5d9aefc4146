//! GraphEngine: the loaded, read-only graph shared by all queries

use super::causal_graph::{CausalGraph, SignificanceTable};
use super::edge::CausalEdge;
use super::evidence_index::EvidenceIndex;
use super::node::{Entity, EntityId};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Index of edge positions for fast neighbour lookups
///
/// Self-loops and edges whose endpoints are not nodes are left out; the
/// stored graph itself is never modified.
#[derive(Debug, Clone, Default)]
struct AdjacencyIndex {
    outgoing: HashMap<EntityId, Vec<usize>>,
    incoming: HashMap<EntityId, Vec<usize>>,
}

impl AdjacencyIndex {
    fn build(graph: &CausalGraph) -> Self {
        let mut outgoing: HashMap<EntityId, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<EntityId, Vec<usize>> = HashMap::new();

        for (i, edge) in graph.edges.iter().enumerate() {
            if !graph.serves(edge) {
                debug!(
                    source = %edge.source(),
                    target = %edge.target(),
                    "self-loop or dangling edge, not indexed"
                );
                continue;
            }
            outgoing.entry(edge.source().clone()).or_default().push(i);
            incoming.entry(edge.target().clone()).or_default().push(i);
        }

        Self { outgoing, incoming }
    }
}

/// The main query-side engine
///
/// Constructed once at an explicit load step and then passed by reference
/// to every query. Nothing here is mutated after `load`.
#[derive(Debug, Clone)]
pub struct GraphEngine {
    graph: CausalGraph,
    adjacency: AdjacencyIndex,
    evidence: EvidenceIndex,
}

impl GraphEngine {
    /// Wrap a built graph with its derived indexes
    pub fn load(graph: CausalGraph) -> Self {
        let adjacency = AdjacencyIndex::build(&graph);
        let evidence = EvidenceIndex::build(&graph);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph loaded"
        );
        Self {
            graph,
            adjacency,
            evidence,
        }
    }

    pub fn graph(&self) -> &CausalGraph {
        &self.graph
    }

    pub fn evidence_index(&self) -> &EvidenceIndex {
        &self.evidence
    }

    pub fn significance(&self) -> &SignificanceTable {
        &self.graph.significance
    }

    pub fn node(&self, id: &EntityId) -> Option<&Entity> {
        self.graph.node(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.graph.contains(id)
    }

    pub fn edge(&self, index: usize) -> Option<&CausalEdge> {
        self.graph.edges.get(index)
    }

    /// Positions of indexed edges leaving `id`
    pub fn outgoing(&self, id: &EntityId) -> &[usize] {
        self.adjacency
            .outgoing
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Positions of indexed edges entering `id`
    pub fn incoming(&self, id: &EntityId) -> &[usize] {
        self.adjacency
            .incoming
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn successors(&self, id: &EntityId) -> BTreeSet<&EntityId> {
        self.outgoing(id)
            .iter()
            .filter_map(|&i| self.edge(i))
            .map(|e| e.target())
            .collect()
    }

    pub fn predecessors(&self, id: &EntityId) -> BTreeSet<&EntityId> {
        self.incoming(id)
            .iter()
            .filter_map(|&i| self.edge(i))
            .map(|e| e.source())
            .collect()
    }

    /// Positions of all indexed edges from `source` to `target`
    pub fn edges_between(&self, source: &EntityId, target: &EntityId) -> Vec<usize> {
        self.outgoing(source)
            .iter()
            .copied()
            .filter(|&i| self.edge(i).is_some_and(|e| e.target() == target))
            .collect()
    }
}
