//! Entity, synonym and evidence lookups

use crate::graph::{EntityId, EvidenceEntry, GraphEngine, Polarity};

/// `"<label> (<id>)"` for every node whose rendering contains `term`,
/// case-insensitively. An empty term matches everything.
pub fn entities(engine: &GraphEngine, term: &str) -> Vec<String> {
    let term = term.to_lowercase();
    engine
        .graph()
        .nodes
        .values()
        .map(|node| format!("{} ({})", node.label, node.id))
        .filter(|rendered| rendered.to_lowercase().contains(&term))
        .collect()
}

/// Descriptions observed for `id`; empty when unknown
pub fn synonyms<'e>(engine: &'e GraphEngine, id: &EntityId) -> &'e [String] {
    engine.graph().synonyms_of(id)
}

/// Evidence sentences for edges from `source` to `target` with `polarity`
pub fn evidence<'e>(
    engine: &'e GraphEngine,
    source: &EntityId,
    target: &EntityId,
    polarity: Polarity,
) -> &'e [EvidenceEntry] {
    engine.evidence_index().evidence_for(source, target, polarity)
}
