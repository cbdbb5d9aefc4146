//! Query engine tests over small hand-built graphs.

mod common;

use causalkg::graph::SignificanceRecord;
use causalkg::query::{self, Direction, InteractionQuery, NeighborsQuery, PathQuery};
use causalkg::{EntityId, GraphEngine, Polarity, QueryConfig, QueryError};
use common::{engine_of, graph_of, stored_edge, weighted_edge};

fn id(s: &str) -> EntityId {
    EntityId::from(s)
}

fn config() -> QueryConfig {
    QueryConfig::default()
}

// ========================================================================
// neighbors
// ========================================================================

#[test]
fn neighbors_keeps_top_hundred_by_frequency() {
    let mut edges = Vec::new();
    for i in 1..=150u64 {
        let other = format!("x:N{}", i);
        if i % 2 == 0 {
            edges.push(weighted_edge("x:F", &other, i));
        } else {
            edges.push(weighted_edge(&other, "x:F", i));
        }
    }
    let engine = engine_of(edges);

    let result = query::neighbors(&engine, &id("x:F"), &config());

    assert_eq!(result.edges.len(), 100);
    let freqs: Vec<u64> = result.edges.iter().map(|e| e.freq).collect();
    assert_eq!(freqs[0], 150);
    assert_eq!(*freqs.last().unwrap(), 51);
    assert!(freqs.windows(2).all(|w| w[0] >= w[1]));
    // Focal plus one neighbour per kept edge
    assert_eq!(result.nodes.len(), 101);
}

#[test]
fn neighbors_limit_is_configurable() {
    let engine = engine_of(vec![
        weighted_edge("x:F", "x:A", 1),
        weighted_edge("x:F", "x:B", 7),
        weighted_edge("x:C", "x:F", 4),
    ]);
    let result = NeighborsQuery::of(id("x:F")).limit(2).execute(&engine);

    let targets: Vec<(&str, &str)> = result
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(targets, vec![("x:F", "x:B"), ("x:C", "x:F")]);
    assert_eq!(result.edges[0].id, 0);
    assert_eq!(result.edges[1].id, 1);
}

#[test]
fn neighbors_attach_significance() {
    let mut graph = graph_of(vec![stored_edge("x:F", "x:A", "Positive_activation", &["s"])]);
    graph.significance.insert(
        "PMC1".into(),
        vec![
            SignificanceRecord::new("p", "= 0.01"),
            SignificanceRecord::new("p", "n.s."),
        ],
    );
    let engine = GraphEngine::load(graph);

    let result = query::neighbors(&engine, &id("x:F"), &config());
    let edge = &result.edges[0];
    assert!(edge.has_significance);
    assert_eq!(edge.num_with_significance, 1);
    assert_eq!(edge.p_values, vec![0.01]);
    assert_eq!(edge.polarity, Polarity::Positive);
}

#[test]
fn neighbors_of_unknown_entity_is_empty() {
    let engine = engine_of(vec![weighted_edge("x:F", "x:A", 1)]);
    assert!(query::neighbors(&engine, &id("x:missing"), &config()).is_empty());
}

// ========================================================================
// interaction
// ========================================================================

fn triangle() -> GraphEngine {
    engine_of(vec![
        stored_edge("x:A", "x:M", "Positive_activation", &["a raises m"]),
        stored_edge("x:M", "x:B", "Positive_activation", &["m raises b"]),
        stored_edge("x:M", "x:A", "Negative_activation", &["m lowers a"]),
    ])
}

#[test]
fn interaction_follows_path_edges_only() {
    let engine = triangle();
    let result = query::interaction(&engine, &id("x:A"), &id("x:B"), false, &config()).unwrap();

    let pairs: Vec<(&str, &str)> = result
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(pairs, vec![("x:A", "x:M"), ("x:M", "x:B")]);

    let nodes: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(nodes, vec!["x:A", "x:M", "x:B"]);
    assert_eq!(result.nodes[1].label, "x:m");
}

#[test]
fn bidirectional_interaction_includes_reverse_edges() {
    let engine = triangle();
    let result = InteractionQuery::between(id("x:A"), id("x:B"))
        .bidirectional(true)
        .execute(&engine, &config())
        .unwrap();

    assert_eq!(result.edges.len(), 3);
    assert!(result
        .edges
        .iter()
        .any(|e| e.source.as_str() == "x:M" && e.target.as_str() == "x:A"));
    let ids: Vec<usize> = result.edges.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn composite_labels_split_and_merge() {
    let mut composite = stored_edge(
        "x:A",
        "x:B",
        "Positive_activation ++++ Negative_activation",
        &["s1", "s2"],
    );
    composite.trigger = "raises ++++ lowers".into();
    let mut plain = stored_edge("x:A", "x:B", "Positive_activation", &["s3", "s4", "s5"]);
    plain.trigger = "induces".into();
    let engine = engine_of(vec![composite, plain]);

    let result = query::interaction(&engine, &id("x:A"), &id("x:B"), false, &config()).unwrap();

    assert_eq!(result.edges.len(), 2);
    let positive = &result.edges[0];
    assert_eq!(positive.label, "Positive_activation");
    assert_eq!(positive.freq, 5);
    assert_eq!(positive.trigger, "raises, lowers, induces");
    assert_eq!(positive.polarity, Polarity::Positive);

    let negative = &result.edges[1];
    assert_eq!(negative.label, "Negative_activation");
    assert_eq!(negative.freq, 2);
    assert_eq!(negative.polarity, Polarity::Negative);

    assert_eq!(result.cluster_edges.len(), 1);
    assert_eq!(result.cluster_edges[0].freq, 7);
}

#[test]
fn interaction_without_path_is_an_error() {
    let engine = engine_of(vec![
        weighted_edge("x:A", "x:B", 1),
        weighted_edge("x:C", "x:D", 1),
    ]);
    let err = query::interaction(&engine, &id("x:A"), &id("x:D"), false, &config()).unwrap_err();
    assert_eq!(
        err,
        QueryError::NoPathExists {
            from: id("x:A"),
            to: id("x:D"),
        }
    );

    // Edges are directed
    assert!(query::interaction(&engine, &id("x:B"), &id("x:A"), false, &config()).is_err());
}

#[test]
fn interaction_with_unknown_entity_is_empty() {
    let engine = triangle();
    let result = query::interaction(&engine, &id("x:A"), &id("x:nowhere"), false, &config()).unwrap();
    assert!(result.is_empty());
}

#[test]
fn interaction_does_not_mutate_graph() {
    let engine = triangle();
    let before = engine.graph().clone();
    let _ = query::interaction(&engine, &id("x:A"), &id("x:B"), true, &config());
    let _ = query::neighbors(&engine, &id("x:M"), &config());
    assert_eq!(engine.graph(), &before);
}

#[test]
fn path_query_respects_direction() {
    let engine = triangle();
    let forward = PathQuery::between(id("x:B"), id("x:A")).execute(&engine);
    assert!(!forward.found);

    let reverse = PathQuery::between(id("x:B"), id("x:A"))
        .direction(Direction::Incoming)
        .execute(&engine);
    assert!(reverse.found);
    assert_eq!(reverse.length, 2);
}

// ========================================================================
// overview and lookups
// ========================================================================

fn star() -> GraphEngine {
    let mut graph = graph_of(vec![
        stored_edge("x:F", "x:A", "Positive_activation", &["f raises a", "f lifts a"]),
        stored_edge("x:A", "x:F", "Positive_activation", &["a raises f"]),
        stored_edge("x:F", "x:B", "Negative_activation", &["f lowers b"]),
        stored_edge("x:C", "x:F", "Positive_activation", &["c raises f"]),
    ]);
    graph.synonyms.insert(id("x:F"), vec!["focal".into(), "f".into()]);
    GraphEngine::load(graph)
}

#[test]
fn overview_classifies_neighbours() {
    let engine = star();
    let overview = query::overview(&engine, &id("x:F"));

    let ids = |entries: &[query::OverviewEntry]| -> Vec<String> {
        entries.iter().map(|e| e.id.to_string()).collect()
    };
    assert_eq!(ids(&overview.reciprocals), vec!["x:A"]);
    assert_eq!(ids(&overview.influenced), vec!["x:B"]);
    assert_eq!(ids(&overview.influencers), vec!["x:C"]);

    let reciprocal = &overview.reciprocals[0];
    assert_eq!(reciprocal.frequency, 3);
    assert_eq!(reciprocal.weights.avg_impact, 1.0);
    assert_eq!(reciprocal.weights.avg_pvalue, 1.0);
    assert!(!reciprocal.weights.has_significance);
}

#[test]
fn overview_of_unknown_entity_is_empty() {
    assert!(query::overview(&star(), &id("x:Q")).is_empty());
}

#[test]
fn entities_match_label_or_id() {
    let engine = star();
    assert_eq!(query::entities(&engine, "X:A"), vec!["x:a (x:A)"]);
    assert_eq!(query::entities(&engine, "").len(), 4);
    assert!(query::entities(&engine, "zzz").is_empty());
}

#[test]
fn synonyms_lookup() {
    let engine = star();
    assert_eq!(query::synonyms(&engine, &id("x:F")), ["focal", "f"]);
    assert!(query::synonyms(&engine, &id("x:A")).is_empty());
}

#[test]
fn evidence_lookup_by_polarity() {
    let engine = star();
    let positive = query::evidence(&engine, &id("x:F"), &id("x:A"), Polarity::Positive);
    assert_eq!(positive.len(), 2);
    assert_eq!(positive[0].sentence, "f raises a");
    assert_eq!(
        positive[0].list_item,
        "(1.00) <a href=\"https://example.org/PMC1\" target=\"_blank\">Source</a>: f raises a"
    );

    assert!(query::evidence(&engine, &id("x:F"), &id("x:A"), Polarity::Negative).is_empty());
}

#[test]
fn evidence_lookup_skips_self_loops() {
    let engine = engine_of(vec![
        stored_edge("x:F", "x:F", "Positive_activation", &["f raises itself"]),
        stored_edge("x:F", "x:A", "Positive_activation", &["f raises a"]),
    ]);
    assert!(query::evidence(&engine, &id("x:F"), &id("x:F"), Polarity::Positive).is_empty());
    assert_eq!(
        query::evidence(&engine, &id("x:F"), &id("x:A"), Polarity::Positive).len(),
        1
    );
    // Still stored
    assert_eq!(engine.graph().edge_count(), 2);
}
