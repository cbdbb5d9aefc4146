//! Per-edge accumulation during the build pass

use super::evidence::EvidenceSet;
use crate::graph::{EdgeKey, EvidenceItem};
use std::collections::{BTreeMap, BTreeSet};

/// What one row contributes to one edge
#[derive(Debug, Clone)]
pub struct EdgeObservation<'a> {
    /// Raw SEEN count of the row
    pub frequency: u64,
    /// Provenance document id
    pub document: &'a str,
    pub link: &'a str,
    pub journal: Option<&'a str>,
    pub impact: f64,
    pub sentences: Vec<&'a str>,
}

/// Accumulated state of one edge
///
/// Mutated only while rows are being consumed; frozen into a `CausalEdge`
/// at finalization.
#[derive(Debug, Clone, Default)]
pub struct EdgeRecord {
    /// Sum of raw SEEN counts
    pub frequency: u64,
    pub evidence: EvidenceSet,
    pub seen_in: BTreeSet<String>,
    pub journals: BTreeSet<String>,
    pub impact_factors: Vec<f64>,
}

impl EdgeRecord {
    pub fn observe(&mut self, observation: &EdgeObservation<'_>) {
        self.frequency += observation.frequency;
        self.seen_in.insert(observation.document.to_string());
        for sentence in &observation.sentences {
            self.evidence.insert(EvidenceItem::new(
                observation.link,
                observation.impact,
                *sentence,
            ));
        }
        if let Some(journal) = observation.journal {
            self.journals.insert(journal.to_string());
        }
        self.impact_factors.push(observation.impact);
    }

    pub fn merge(&mut self, other: EdgeRecord) {
        self.frequency += other.frequency;
        self.evidence.merge(other.evidence);
        self.seen_in.extend(other.seen_in);
        self.journals.extend(other.journals);
        self.impact_factors.extend(other.impact_factors);
    }
}

/// One record per edge key; merge-on-insert
#[derive(Debug, Clone, Default)]
pub struct EdgeAggregator {
    records: BTreeMap<EdgeKey, EdgeRecord>,
}

impl EdgeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: EdgeKey, observation: &EdgeObservation<'_>) {
        self.records.entry(key).or_default().observe(observation);
    }

    /// Fold in an aggregator built from a disjoint partition of rows
    pub fn merge(&mut self, other: EdgeAggregator) {
        for (key, record) in other.records {
            self.records.entry(key).or_default().merge(record);
        }
    }

    pub fn get(&self, key: &EdgeKey) -> Option<&EdgeRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> impl Iterator<Item = (EdgeKey, EdgeRecord)> {
        self.records.into_iter()
    }
}
