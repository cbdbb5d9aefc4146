//! Overview of an entity's neighbourhood
//!
//! Neighbours are classified as reciprocals (edges both ways), influenced
//! (focal → neighbour only) and influencers (neighbour → focal only).

use super::presentation::impact_stats;
use super::summary::summarize;
use crate::graph::{EntityId, GraphEngine};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Aggregate weights of the directed edges from one entity to another
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightTerms {
    pub has_significance: bool,
    /// Documents with significance records per impact value
    pub percentage_significance: f64,
    pub avg_impact: f64,
    pub max_impact: f64,
    /// Mean p-value, 1.0 when none was extracted
    pub avg_pvalue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewEntry {
    pub id: EntityId,
    pub label: String,
    /// Evidence count between the focal entity and this one, both directions
    pub frequency: u64,
    pub weights: WeightTerms,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub reciprocals: Vec<OverviewEntry>,
    pub influenced: Vec<OverviewEntry>,
    pub influencers: Vec<OverviewEntry>,
}

impl Overview {
    pub fn is_empty(&self) -> bool {
        self.reciprocals.is_empty() && self.influenced.is_empty() && self.influencers.is_empty()
    }
}

/// Classify the neighbours of `focal`; empty for an unknown entity
pub fn overview(engine: &GraphEngine, focal: &EntityId) -> Overview {
    if !engine.contains(focal) {
        debug!(%focal, "unknown entity");
        return Overview::default();
    }

    let successors = engine.successors(focal);
    let predecessors = engine.predecessors(focal);

    let reciprocals: BTreeSet<&EntityId> = successors.intersection(&predecessors).copied().collect();
    let influenced = successors.difference(&reciprocals).copied();
    let influencers = predecessors.difference(&reciprocals).copied();

    let entry = |other: &EntityId, weights: WeightTerms| -> Option<OverviewEntry> {
        let node = engine.node(other)?;
        Some(OverviewEntry {
            id: other.clone(),
            label: node.label.clone(),
            frequency: engine.evidence_index().pair_frequency(focal, other),
            weights,
        })
    };

    let mut overview = Overview {
        reciprocals: reciprocals
            .iter()
            .copied()
            .filter_map(|r| entry(r, weight_terms(engine, focal, r)))
            .collect(),
        influenced: influenced
            .filter_map(|r| entry(r, weight_terms(engine, focal, r)))
            .collect(),
        influencers: influencers
            .filter_map(|r| entry(r, weight_terms(engine, r, focal)))
            .collect(),
    };

    for entries in [
        &mut overview.reciprocals,
        &mut overview.influenced,
        &mut overview.influencers,
    ] {
        entries.sort_by_cached_key(|e| e.label.to_lowercase());
    }
    overview
}

/// Weights of all edges from `from` to `to`
pub fn weight_terms(engine: &GraphEngine, from: &EntityId, to: &EntityId) -> WeightTerms {
    let mut has_significance = false;
    let mut with_significance = 0usize;
    let mut impacts: Vec<f64> = Vec::new();
    let mut p_values: Vec<f64> = Vec::new();

    for edge in engine
        .edges_between(from, to)
        .into_iter()
        .filter_map(|i| engine.edge(i))
    {
        let summary = summarize(edge, engine.significance());
        has_significance |= summary.has_significance;
        with_significance += summary.num_with_significance;
        p_values.extend(summary.p_values);
        impacts.extend_from_slice(&edge.impact_factors);
    }

    let (avg_impact, max_impact) = impact_stats(&impacts);
    let percentage_significance = if impacts.is_empty() {
        0.0
    } else {
        with_significance as f64 / impacts.len() as f64
    };
    let avg_pvalue = if p_values.is_empty() {
        1.0
    } else {
        p_values.iter().sum::<f64>() / p_values.len() as f64
    };

    WeightTerms {
        has_significance,
        percentage_significance,
        avg_impact,
        max_impact,
        avg_pvalue,
    }
}
