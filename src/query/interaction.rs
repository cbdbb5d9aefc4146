//! Interaction subgraphs: the shortest path between two entities
//!
//! Stored edges along the path are split on their composite label into one
//! logical edge per event label, and logical edges sharing
//! (source, target, label) are merged.

use super::path::PathQuery;
use super::presentation::{impact_stats, PresentationEdge, PresentationGraph};
use super::summary::{summarize, SignificanceSummary};
use super::types::{QueryError, QueryResult};
use crate::config::QueryConfig;
use crate::graph::{CausalEdge, EntityId, GraphEngine, Polarity};
use std::collections::HashMap;
use tracing::debug;

/// Query for the subgraph connecting two entities
#[derive(Debug, Clone)]
pub struct InteractionQuery {
    pub source: EntityId,
    pub destination: EntityId,
    /// Keep every edge among path nodes, not only those along the path
    pub bidirectional: bool,
}

impl InteractionQuery {
    pub fn between(source: EntityId, destination: EntityId) -> Self {
        Self {
            source,
            destination,
            bidirectional: false,
        }
    }

    pub fn bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    pub fn execute(&self, engine: &GraphEngine, config: &QueryConfig) -> QueryResult<PresentationGraph> {
        if !engine.contains(&self.source) || !engine.contains(&self.destination) {
            debug!(source = %self.source, destination = %self.destination, "unknown entity");
            return Ok(PresentationGraph::empty());
        }

        let path = PathQuery::between(self.source.clone(), self.destination.clone()).execute(engine);
        if !path.found {
            return Err(QueryError::NoPathExists {
                from: self.source.clone(),
                to: self.destination.clone(),
            });
        }

        let candidates: Vec<usize> = if self.bidirectional {
            let mut nodes: Vec<&EntityId> = path.path.iter().collect();
            nodes.sort();
            let mut candidates = Vec::new();
            for a in &nodes {
                for b in &nodes {
                    if a != b {
                        candidates.extend(engine.edges_between(a, b));
                    }
                }
            }
            candidates
        } else {
            path.hops()
                .flat_map(|(a, b)| engine.edges_between(a, b))
                .collect()
        };

        let separator = config.label_separator.as_str();
        let mut merged: Vec<LogicalEdge> = Vec::new();
        let mut positions: HashMap<(EntityId, EntityId, String), usize> = HashMap::new();

        for edge in candidates.into_iter().filter_map(|i| engine.edge(i)) {
            let summary = summarize(edge, engine.significance());
            for token in distinct_tokens(&edge.label, separator) {
                let key = (edge.source().clone(), edge.target().clone(), token.to_string());
                match positions.get(&key) {
                    Some(&at) => merged[at].absorb(edge, &summary, separator),
                    None => {
                        positions.insert(key, merged.len());
                        merged.push(LogicalEdge::new(edge, token, &summary, separator));
                    }
                }
            }
        }

        debug!(
            source = %self.source,
            destination = %self.destination,
            hops = path.length,
            edges = merged.len(),
            "interaction subgraph"
        );

        let edges = merged.into_iter().map(LogicalEdge::into_presentation).collect();
        Ok(PresentationGraph::from_edges(engine, edges))
    }
}

/// Distinct non-empty tokens of a composite field, first seen first
fn distinct_tokens<'a>(field: &'a str, separator: &str) -> Vec<&'a str> {
    let mut tokens: Vec<&str> = Vec::new();
    for token in field.split(separator) {
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// One event label's share of the stored edges between a node pair
#[derive(Debug, Clone)]
struct LogicalEdge {
    source: EntityId,
    target: EntityId,
    label: String,
    freq: u64,
    triggers: Vec<String>,
    seen_in: Vec<String>,
    impact_factors: Vec<f64>,
    summary: SignificanceSummary,
}

impl LogicalEdge {
    fn new(edge: &CausalEdge, label: &str, summary: &SignificanceSummary, separator: &str) -> Self {
        let mut logical = Self {
            source: edge.source().clone(),
            target: edge.target().clone(),
            label: label.to_string(),
            freq: 0,
            triggers: Vec::new(),
            seen_in: Vec::new(),
            impact_factors: Vec::new(),
            summary: SignificanceSummary::default(),
        };
        logical.absorb(edge, summary, separator);
        logical
    }

    fn absorb(&mut self, edge: &CausalEdge, summary: &SignificanceSummary, separator: &str) {
        self.freq += edge.freq;
        for trigger in distinct_tokens(&edge.trigger, separator) {
            if !self.triggers.iter().any(|t| t == trigger) {
                self.triggers.push(trigger.to_string());
            }
        }
        for document in &edge.seen_in {
            if !self.seen_in.contains(document) {
                self.seen_in.push(document.clone());
            }
        }
        self.impact_factors.extend_from_slice(&edge.impact_factors);
        self.summary.absorb(summary);
    }

    fn into_presentation(self) -> PresentationEdge {
        let (avg_impact, max_impact) = impact_stats(&self.impact_factors);
        PresentationEdge {
            id: 0,
            polarity: Polarity::from_label(&self.label),
            source: self.source,
            target: self.target,
            freq: self.freq,
            trigger: self.triggers.join(", "),
            label: self.label,
            has_significance: self.summary.has_significance,
            num_with_significance: self.summary.num_with_significance,
            p_values: self.summary.p_values,
            avg_impact,
            max_impact,
            seen_in: self.seen_in,
        }
    }
}
