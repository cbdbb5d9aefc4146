//! EvidenceIndex: evidence lookups derived from a loaded graph
//!
//! Built alongside the immutable graph at load time so that queries can
//! serve evidence without touching (or trimming) the stored edges. Like the
//! adjacency index, it leaves out self-loops and dangling edges.

use super::causal_graph::CausalGraph;
use super::edge::Polarity;
use super::node::EntityId;
use crate::build::evidence::canonical_sentence;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A presentation-ready evidence item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    /// Markup-free sentence
    pub sentence: String,
    pub markup: String,
    pub hyperlink: String,
    pub impact: f64,
    /// Rendered list entry: impact, source link and sentence markup
    pub list_item: String,
}

impl EvidenceEntry {
    fn new(hyperlink: &str, impact: f64, markup: &str) -> Self {
        let list_item = format!(
            "({:.2}) <a href=\"{}\" target=\"_blank\">Source</a>: {}",
            impact, hyperlink, markup
        );
        Self {
            sentence: canonical_sentence(markup),
            markup: markup.to_string(),
            hyperlink: hyperlink.to_string(),
            impact,
            list_item,
        }
    }
}

type EvidenceKey = (EntityId, EntityId, Polarity);

/// Unordered node pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PairKey(EntityId, EntityId);

impl PairKey {
    fn new(a: &EntityId, b: &EntityId) -> Self {
        if a <= b {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        }
    }
}

/// Evidence grouped by (source, target, polarity) plus per-pair frequency totals
#[derive(Debug, Clone, Default)]
pub struct EvidenceIndex {
    evidence: HashMap<EvidenceKey, Vec<EvidenceEntry>>,
    frequencies: HashMap<PairKey, u64>,
}

impl EvidenceIndex {
    pub fn build(graph: &CausalGraph) -> Self {
        let mut evidence: HashMap<EvidenceKey, Vec<EvidenceEntry>> = HashMap::new();
        let mut listed: HashMap<EvidenceKey, HashSet<String>> = HashMap::new();
        let mut frequencies: HashMap<PairKey, u64> = HashMap::new();

        for edge in graph.edges().filter(|e| graph.serves(e)) {
            let key = (edge.source().clone(), edge.target().clone(), edge.polarity());

            let mut distinct: HashSet<&str> = HashSet::new();
            let entries = evidence.entry(key.clone()).or_default();
            let seen = listed.entry(key).or_default();

            for item in &edge.evidence {
                let entry = EvidenceEntry::new(&item.link, item.impact, &item.markup);
                distinct.insert(item.markup.as_str());
                if seen.insert(entry.list_item.clone()) {
                    entries.push(entry);
                }
            }

            *frequencies
                .entry(PairKey::new(edge.source(), edge.target()))
                .or_insert(0) += distinct.len() as u64;
        }

        Self {
            evidence,
            frequencies,
        }
    }

    /// Evidence for edges from `source` to `target` with the given polarity
    pub fn evidence_for(
        &self,
        source: &EntityId,
        target: &EntityId,
        polarity: Polarity,
    ) -> &[EvidenceEntry] {
        self.evidence
            .get(&(source.clone(), target.clone(), polarity))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Total evidence count between two nodes, in either direction
    pub fn pair_frequency(&self, a: &EntityId, b: &EntityId) -> u64 {
        self.frequencies
            .get(&PairKey::new(a, b))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CausalEdge, Entity, EvidenceItem};

    /// Graph over `edges` with every endpoint present as a node
    fn graph_of(edges: Vec<CausalEdge>) -> CausalGraph {
        let mut graph = CausalGraph::new();
        for edge in &edges {
            for id in [&edge.controller, &edge.output] {
                graph.nodes.insert(id.clone(), Entity::new(id.clone(), id.as_str()));
            }
        }
        graph.edges = edges;
        graph
    }

    fn edge(from: &str, to: &str, label: &str, evidence: Vec<EvidenceItem>) -> CausalEdge {
        CausalEdge {
            controller: from.into(),
            input: from.into(),
            output: to.into(),
            trigger: "increases".into(),
            label: label.into(),
            freq: evidence.len() as u64,
            evidence,
            seen_in: vec!["PMC1".into()],
            journals: vec![],
            impact_factors: vec![1.0],
        }
    }

    #[test]
    fn groups_evidence_by_polarity() {
        let graph = graph_of(vec![
            edge(
                "a:1",
                "b:2",
                "Positive_activation",
                vec![EvidenceItem::new("http://x", 1.5, "<b>A</b> raises B")],
            ),
            edge(
                "a:1",
                "b:2",
                "Negative_activation",
                vec![EvidenceItem::new("http://y", 0.5, "A lowers B")],
            ),
        ]);

        let index = EvidenceIndex::build(&graph);
        let positive = index.evidence_for(&"a:1".into(), &"b:2".into(), Polarity::Positive);
        assert_eq!(positive.len(), 1);
        assert_eq!(positive[0].sentence, "A raises B");
        assert_eq!(
            positive[0].list_item,
            "(1.50) <a href=\"http://x\" target=\"_blank\">Source</a>: <b>A</b> raises B"
        );
        assert!(index
            .evidence_for(&"b:2".into(), &"a:1".into(), Polarity::Positive)
            .is_empty());
    }

    #[test]
    fn pair_frequency_is_direction_agnostic() {
        let graph = graph_of(vec![
            edge(
                "a:1",
                "b:2",
                "Positive_activation",
                vec![
                    EvidenceItem::new("http://x", 1.0, "one"),
                    EvidenceItem::new("http://x", 1.0, "two"),
                ],
            ),
            edge(
                "b:2",
                "a:1",
                "Association",
                vec![EvidenceItem::new("http://z", 1.0, "three")],
            ),
        ]);

        let index = EvidenceIndex::build(&graph);
        assert_eq!(index.pair_frequency(&"a:1".into(), &"b:2".into()), 3);
        assert_eq!(index.pair_frequency(&"b:2".into(), &"a:1".into()), 3);
        assert_eq!(index.pair_frequency(&"a:1".into(), &"c:3".into()), 0);
    }

    #[test]
    fn self_loops_and_dangling_edges_are_not_indexed() {
        let mut graph = graph_of(vec![
            edge(
                "a:1",
                "a:1",
                "Positive_activation",
                vec![EvidenceItem::new("http://x", 1.0, "A raises A")],
            ),
            edge(
                "a:1",
                "b:2",
                "Positive_activation",
                vec![EvidenceItem::new("http://x", 1.0, "A raises B")],
            ),
        ]);
        graph.nodes.remove(&EntityId::from("b:2"));

        let index = EvidenceIndex::build(&graph);
        assert!(index
            .evidence_for(&"a:1".into(), &"a:1".into(), Polarity::Positive)
            .is_empty());
        assert!(index
            .evidence_for(&"a:1".into(), &"b:2".into(), Polarity::Positive)
            .is_empty());
        assert_eq!(index.pair_frequency(&"a:1".into(), &"a:1".into()), 0);
        assert_eq!(index.pair_frequency(&"a:1".into(), &"b:2".into()), 0);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn building_the_index_leaves_edges_untouched() {
        let graph = graph_of(vec![edge(
            "a:1",
            "b:2",
            "Positive_activation",
            vec![EvidenceItem::new("http://x", 1.0, "one")],
        )]);
        let before = graph.clone();
        let _ = EvidenceIndex::build(&graph);
        assert_eq!(graph, before);
    }
}
