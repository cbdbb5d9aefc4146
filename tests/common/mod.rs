//! Common test utilities for causalkg integration tests
//!
//! Fixtures are built either from tab-separated extraction text (the same
//! format the build pass reads from disk) or directly as stored edges for
//! query tests.

#![allow(dead_code)]

use causalkg::{
    BuildConfig, BuildOutput, CausalEdge, CausalGraph, Entity, EntityId, EvidenceItem,
    GraphBuilder, GraphEngine,
};

pub const HEADER: &str =
    "CONTROLLER\tINPUT\tOUTPUT\tTRIGGERS\tEVENT LABEL\tEVENT ID\tSEEN IN\tSEEN\tEVIDENCE";

/// One extraction row, in header order
pub struct Row<'a> {
    pub controller: &'a str,
    pub input: &'a str,
    pub output: &'a str,
    pub trigger: &'a str,
    pub label: &'a str,
    pub event_id: &'a str,
    pub seen_in: &'a str,
    pub seen: &'a str,
    pub evidence: &'a str,
}

impl<'a> Row<'a> {
    /// Controller → output activation seen once in `seen_in`; the input
    /// is the output, as in the extractor's activation events
    pub fn event(controller: &'a str, output: &'a str, seen_in: &'a str, evidence: &'a str) -> Self {
        Self {
            controller,
            input: output,
            output,
            trigger: "increases",
            label: "Positive_activation",
            event_id: "E1",
            seen_in,
            seen: "1",
            evidence,
        }
    }

    pub fn with_input(mut self, input: &'a str) -> Self {
        self.input = input;
        self
    }

    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn with_event_id(mut self, event_id: &'a str) -> Self {
        self.event_id = event_id;
        self
    }

    pub fn with_seen(mut self, seen: &'a str) -> Self {
        self.seen = seen;
        self
    }

    fn line(&self) -> String {
        [
            self.controller,
            self.input,
            self.output,
            self.trigger,
            self.label,
            self.event_id,
            self.seen_in,
            self.seen,
            self.evidence,
        ]
        .join("\t")
    }
}

/// Tab-separated extraction text with a header line
pub fn tsv(rows: &[Row<'_>]) -> String {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(&row.line());
    }
    text.push('\n');
    text
}

pub fn builder() -> GraphBuilder {
    GraphBuilder::new(BuildConfig::default()).unwrap()
}

/// Read `rows` as one extraction file and build a graph from them
pub fn build_rows(builder: &GraphBuilder, rows: &[Row<'_>]) -> BuildOutput {
    let parsed = builder.read_str(&tsv(rows), "PMC9-extractions.tsv").unwrap();
    builder.build(&parsed)
}

pub fn find_edge<'g>(graph: &'g CausalGraph, controller: &str, output: &str) -> Option<&'g CausalEdge> {
    graph
        .edges
        .iter()
        .find(|e| e.controller.as_str() == controller && e.output.as_str() == output)
}

/// A stored edge with one evidence item per sentence
pub fn stored_edge(from: &str, to: &str, label: &str, sentences: &[&str]) -> CausalEdge {
    CausalEdge {
        controller: EntityId::from(from),
        input: EntityId::from(from),
        output: EntityId::from(to),
        trigger: "increases".into(),
        label: label.into(),
        freq: sentences.len() as u64,
        evidence: sentences
            .iter()
            .map(|s| EvidenceItem::new("https://example.org/PMC1", 1.0, *s))
            .collect(),
        seen_in: vec!["PMC1".into()],
        journals: vec![],
        impact_factors: vec![1.0],
    }
}

/// A stored edge with the given frequency and no evidence
pub fn weighted_edge(from: &str, to: &str, freq: u64) -> CausalEdge {
    let mut edge = stored_edge(from, to, "Positive_activation", &[]);
    edge.freq = freq;
    edge
}

/// Graph over `edges`, every endpoint labelled with its lower-cased id
pub fn graph_of(edges: Vec<CausalEdge>) -> CausalGraph {
    let mut graph = CausalGraph::new();
    for edge in &edges {
        for id in [&edge.controller, &edge.output] {
            graph
                .nodes
                .entry(id.clone())
                .or_insert_with(|| Entity::new(id.clone(), id.as_str().to_lowercase()));
        }
    }
    graph.edges = edges;
    graph
}

pub fn engine_of(edges: Vec<CausalEdge>) -> GraphEngine {
    GraphEngine::load(graph_of(edges))
}
