//! Neighbourhood (ego) subgraphs

use super::presentation::{PresentationEdge, PresentationGraph};
use super::summary::summarize;
use crate::config::QueryConfig;
use crate::graph::{EntityId, GraphEngine};
use std::cmp::Reverse;
use tracing::debug;

/// Query for the most frequent edges incident to one entity
#[derive(Debug, Clone)]
pub struct NeighborsQuery {
    pub focal: EntityId,
    /// Maximum number of edges kept
    pub limit: usize,
}

impl NeighborsQuery {
    pub fn of(focal: EntityId) -> Self {
        Self {
            focal,
            limit: QueryConfig::default().neighbor_limit,
        }
    }

    pub fn from_config(focal: EntityId, config: &QueryConfig) -> Self {
        Self::of(focal).limit(config.neighbor_limit)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Incident edges sorted by stored frequency, highest first, truncated
    /// to the limit. Edges pass through in stored form.
    pub fn execute(&self, engine: &GraphEngine) -> PresentationGraph {
        if !engine.contains(&self.focal) {
            debug!(focal = %self.focal, "unknown entity");
            return PresentationGraph::empty();
        }

        let mut incident: Vec<usize> = engine
            .outgoing(&self.focal)
            .iter()
            .chain(engine.incoming(&self.focal))
            .copied()
            .collect();
        incident.sort_by_key(|&i| Reverse(engine.edge(i).map_or(0, |e| e.freq)));

        if incident.len() > self.limit {
            debug!(
                focal = %self.focal,
                kept = self.limit,
                discarded = incident.len() - self.limit,
                "neighbourhood truncated"
            );
            incident.truncate(self.limit);
        }

        let edges = incident
            .into_iter()
            .filter_map(|i| engine.edge(i))
            .map(|edge| PresentationEdge::from_stored(edge, summarize(edge, engine.significance())))
            .collect();
        PresentationGraph::from_edges(engine, edges)
    }
}
