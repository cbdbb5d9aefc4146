//! Subgraph query engine
//!
//! Every query is stateless: it re-derives its result from the loaded
//! [`GraphEngine`](crate::graph::GraphEngine) and never mutates it.

mod interaction;
mod lookup;
mod neighbors;
mod overview;
mod path;
mod presentation;
mod summary;
mod types;

pub use interaction::InteractionQuery;
pub use lookup::{entities, evidence, synonyms};
pub use neighbors::NeighborsQuery;
pub use overview::{overview, weight_terms, Overview, OverviewEntry, WeightTerms};
pub use path::PathQuery;
pub use presentation::{
    impact_stats, ClusterEdge, PresentationEdge, PresentationGraph, PresentationNode,
};
pub use summary::{parse_p_value, summarize, SignificanceSummary};
pub use types::{Direction, PathResult, QueryError, QueryResult};

use crate::config::QueryConfig;
use crate::graph::{EntityId, GraphEngine};

/// Subgraph connecting `source` to `destination`
pub fn interaction(
    engine: &GraphEngine,
    source: &EntityId,
    destination: &EntityId,
    bidirectional: bool,
    config: &QueryConfig,
) -> QueryResult<PresentationGraph> {
    InteractionQuery::between(source.clone(), destination.clone())
        .bidirectional(bidirectional)
        .execute(engine, config)
}

/// Most frequent edges incident to `focal`
pub fn neighbors(engine: &GraphEngine, focal: &EntityId, config: &QueryConfig) -> PresentationGraph {
    NeighborsQuery::from_config(focal.clone(), config).execute(engine)
}
