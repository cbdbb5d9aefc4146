//! Serialization tests with artifact fixtures

use serde_json::{json, Value};

/// Fixture: one stored multi-edge as written by the build pass
fn edge_fixture() -> Value {
    json!({
        "controller": "uniprot:P05231",
        "input": "uniprot:P05231",
        "output": "uniprot:P02741",
        "trigger": "induces",
        "label": "Positive_activation",
        "freq": 2,
        "evidence": [
            {"link": "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC100", "impact": 1.25, "markup": "<b>IL-6</b> induces CRP"},
            {"link": "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC200", "impact": 0.5, "markup": "IL-6 drives CRP"}
        ],
        "seen_in": ["PMC100", "PMC200"],
        "journals": ["Cytokine"],
        "impact_factors": [1.25, 0.5]
    })
}

/// Fixture: a whole graph with side tables
fn graph_fixture() -> Value {
    json!({
        "nodes": {
            "uniprot:P05231": {"id": "uniprot:P05231", "label": "interleukin-6"},
            "uniprot:P02741": {"id": "uniprot:P02741", "label": "c-reactive protein"}
        },
        "edges": [edge_fixture()],
        "significance": {
            "PMC100": [{"type": "p", "value": "= 0.01"}]
        },
        "synonyms": {
            "uniprot:P05231": ["interleukin-6", "il-6"]
        },
        "metadata": {
            "built_at": "2025-11-30T10:00:00Z",
            "rows_read": 12
        }
    })
}

#[cfg(test)]
mod serialization_tests {
    use super::*;
    use crate::graph::{CausalEdge, CausalGraph, EntityId, Polarity, SignificanceRecord};

    #[test]
    fn entity_id_serializes_as_string() {
        let id = EntityId::from_string("uniprot:P05231");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"uniprot:P05231\"");
    }

    #[test]
    fn edge_deserializes_from_fixture() {
        let edge: CausalEdge = serde_json::from_value(edge_fixture()).unwrap();
        assert_eq!(edge.controller.as_str(), "uniprot:P05231");
        assert_eq!(edge.output.as_str(), "uniprot:P02741");
        assert_eq!(edge.freq, 2);
        assert_eq!(edge.evidence.len(), 2);
        assert_eq!(edge.polarity(), Polarity::Positive);
    }

    #[test]
    fn significance_kind_field_renamed() {
        let record = SignificanceRecord::new("p", "0.05");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "p");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn graph_deserializes_from_fixture() {
        let graph: CausalGraph = serde_json::from_value(graph_fixture()).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.significance["PMC100"][0].value, "= 0.01");
        assert_eq!(
            graph.synonyms_of(&EntityId::from("uniprot:P05231")),
            ["interleukin-6".to_string(), "il-6".to_string()]
        );
        assert_eq!(graph.metadata.rows_read, 12);
    }

    #[test]
    fn graph_roundtrip_preserves_artifact() {
        let graph: CausalGraph = serde_json::from_value(graph_fixture()).unwrap();
        let json = serde_json::to_string(&graph).unwrap();
        let back: CausalGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(graph, back);
    }
}
