//! Presentation subgraphs returned by queries
//!
//! Request-scoped and never persisted. Shape:
//! `{nodes: [{id, label}], edges: [...], cluster_edges: [{source, target, freq}]}`.

use super::summary::SignificanceSummary;
use crate::graph::{CausalEdge, EntityId, GraphEngine, Polarity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationNode {
    pub id: EntityId,
    pub label: String,
}

/// One logical edge, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationEdge {
    /// Sequential number within the presentation graph
    pub id: usize,
    pub source: EntityId,
    pub target: EntityId,
    pub freq: u64,
    pub trigger: String,
    pub label: String,
    pub polarity: Polarity,
    pub has_significance: bool,
    pub num_with_significance: usize,
    pub p_values: Vec<f64>,
    pub avg_impact: f64,
    pub max_impact: f64,
    pub seen_in: Vec<String>,
}

impl PresentationEdge {
    /// Presentation form of a stored edge, attributes passed through as stored
    pub fn from_stored(edge: &CausalEdge, summary: SignificanceSummary) -> Self {
        let (avg_impact, max_impact) = impact_stats(&edge.impact_factors);
        Self {
            id: 0,
            source: edge.source().clone(),
            target: edge.target().clone(),
            freq: edge.freq,
            trigger: edge.trigger.clone(),
            label: edge.label.clone(),
            polarity: edge.polarity(),
            has_significance: summary.has_significance,
            num_with_significance: summary.num_with_significance,
            p_values: summary.p_values,
            avg_impact,
            max_impact,
            seen_in: edge.seen_in.clone(),
        }
    }
}

/// Rollup of all logical edges between one ordered node pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterEdge {
    pub source: EntityId,
    pub target: EntityId,
    pub freq: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresentationGraph {
    pub nodes: Vec<PresentationNode>,
    pub edges: Vec<PresentationEdge>,
    pub cluster_edges: Vec<ClusterEdge>,
}

impl PresentationGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Assemble a presentation graph from its edges
    ///
    /// Edges are numbered in order, nodes are the edge endpoints in order of
    /// first appearance, and one cluster edge is emitted per ordered pair.
    pub fn from_edges(engine: &GraphEngine, mut edges: Vec<PresentationEdge>) -> Self {
        let mut nodes = Vec::new();
        let mut listed: HashSet<EntityId> = HashSet::new();
        let mut clusters: BTreeMap<(EntityId, EntityId), u64> = BTreeMap::new();

        for (i, edge) in edges.iter_mut().enumerate() {
            edge.id = i;
            for id in [&edge.source, &edge.target] {
                if listed.insert(id.clone()) {
                    nodes.push(PresentationNode {
                        id: id.clone(),
                        label: engine.graph().label_of(id).to_string(),
                    });
                }
            }
            *clusters
                .entry((edge.source.clone(), edge.target.clone()))
                .or_insert(0) += edge.freq;
        }

        let cluster_edges = clusters
            .into_iter()
            .map(|((source, target), freq)| ClusterEdge {
                source,
                target,
                freq,
            })
            .collect();

        Self {
            nodes,
            edges,
            cluster_edges,
        }
    }
}

/// Mean and maximum impact; both 0.0 when there are no values
pub fn impact_stats(impacts: &[f64]) -> (f64, f64) {
    if impacts.is_empty() {
        return (0.0, 0.0);
    }
    let avg = impacts.iter().sum::<f64>() / impacts.len() as f64;
    let max = impacts.iter().copied().fold(0.0, f64::max);
    (avg, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CausalGraph, Entity};

    fn stored(from: &str, to: &str, freq: u64, impacts: Vec<f64>) -> CausalEdge {
        CausalEdge {
            controller: from.into(),
            input: from.into(),
            output: to.into(),
            trigger: "raises".into(),
            label: "Positive_activation".into(),
            freq,
            evidence: vec![],
            seen_in: vec!["PMC1".into()],
            journals: vec![],
            impact_factors: impacts,
        }
    }

    fn engine() -> GraphEngine {
        let mut graph = CausalGraph::new();
        graph.nodes.insert("a:1".into(), Entity::new("a:1", "alpha"));
        graph.nodes.insert("b:2".into(), Entity::new("b:2", "beta"));
        GraphEngine::load(graph)
    }

    #[test]
    fn impact_stats_default_to_zero() {
        assert_eq!(impact_stats(&[]), (0.0, 0.0));
        assert_eq!(impact_stats(&[1.0, 3.0]), (2.0, 3.0));
    }

    #[test]
    fn from_stored_derives_polarity_and_impacts() {
        let edge = PresentationEdge::from_stored(
            &stored("a:1", "b:2", 4, vec![0.5, 1.5]),
            SignificanceSummary::default(),
        );
        assert_eq!(edge.polarity, Polarity::Positive);
        assert_eq!(edge.avg_impact, 1.0);
        assert_eq!(edge.max_impact, 1.5);
        assert_eq!(edge.freq, 4);
    }

    #[test]
    fn cluster_edges_sum_parallel_edges() {
        let engine = engine();
        let edges = vec![
            PresentationEdge::from_stored(&stored("a:1", "b:2", 2, vec![]), Default::default()),
            PresentationEdge::from_stored(&stored("a:1", "b:2", 3, vec![]), Default::default()),
            PresentationEdge::from_stored(&stored("b:2", "a:1", 1, vec![]), Default::default()),
        ];
        let graph = PresentationGraph::from_edges(&engine, edges);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].label, "alpha");
        let ids: Vec<usize> = graph.edges.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(graph.cluster_edges.len(), 2);
        assert_eq!(graph.cluster_edges[0].freq, 5);
        assert_eq!(graph.cluster_edges[1].freq, 1);
    }

    #[test]
    fn serializes_in_presentation_shape() {
        let graph = PresentationGraph::from_edges(
            &engine(),
            vec![PresentationEdge::from_stored(&stored("a:1", "b:2", 2, vec![]), Default::default())],
        );
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["nodes"][0]["id"], "a:1");
        assert_eq!(json["edges"][0]["polarity"], "Positive");
        assert_eq!(json["cluster_edges"][0]["freq"], 2);
    }
}
