//! Significance summaries for stored edges

use crate::graph::{CausalEdge, SignificanceTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Record type of an extracted p-value
const P_VALUE_TYPE: &str = "p";

/// Statistical metadata of one edge, from its provenance documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignificanceSummary {
    pub has_significance: bool,
    /// Number of provenance documents with at least one significance record
    pub num_with_significance: usize,
    pub p_values: Vec<f64>,
}

impl SignificanceSummary {
    /// Fold another summary in (used when logical edges are merged)
    pub fn absorb(&mut self, other: &SignificanceSummary) {
        self.has_significance |= other.has_significance;
        self.num_with_significance += other.num_with_significance;
        self.p_values.extend_from_slice(&other.p_values);
    }
}

/// Summarize the significance records of an edge's provenance documents
pub fn summarize(edge: &CausalEdge, significance: &SignificanceTable) -> SignificanceSummary {
    let documents: BTreeSet<&str> = edge.seen_in.iter().map(String::as_str).collect();
    let mut summary = SignificanceSummary::default();

    for document in documents {
        let Some(records) = significance.get(document) else {
            continue;
        };
        if records.is_empty() {
            continue;
        }
        summary.has_significance = true;
        summary.num_with_significance += 1;

        summary.p_values.extend(
            records
                .iter()
                .filter(|r| r.kind.trim() == P_VALUE_TYPE)
                .filter_map(|r| parse_p_value(&r.value)),
        );
    }

    summary
}

/// Parse a p-value such as `= 0.01`; non-numeric values yield `None`
pub fn parse_p_value(value: &str) -> Option<f64> {
    value
        .trim()
        .trim_matches('=')
        .trim()
        .parse::<f64>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SignificanceRecord;

    fn edge(seen_in: &[&str]) -> CausalEdge {
        CausalEdge {
            controller: "a:1".into(),
            input: "a:1".into(),
            output: "b:2".into(),
            trigger: "t".into(),
            label: "L".into(),
            freq: 1,
            evidence: vec![],
            seen_in: seen_in.iter().map(|s| s.to_string()).collect(),
            journals: vec![],
            impact_factors: vec![],
        }
    }

    #[test]
    fn parses_p_values() {
        assert_eq!(parse_p_value("= 0.01"), Some(0.01));
        assert_eq!(parse_p_value(" 0.5 "), Some(0.5));
        assert_eq!(parse_p_value("< 0.05"), None);
        assert_eq!(parse_p_value("n.s."), None);
    }

    #[test]
    fn counts_documents_with_significance() {
        let mut table = SignificanceTable::new();
        table.insert(
            "PMC1".into(),
            vec![
                SignificanceRecord::new("p", "= 0.01"),
                SignificanceRecord::new(" p ", "0.2"),
                SignificanceRecord::new("r", "0.8"),
                SignificanceRecord::new("p", "< 0.05"),
            ],
        );
        table.insert("PMC3".into(), vec![]);

        let summary = summarize(&edge(&["PMC1", "PMC2", "PMC3"]), &table);
        assert!(summary.has_significance);
        assert_eq!(summary.num_with_significance, 1);
        assert_eq!(summary.p_values, vec![0.01, 0.2]);
    }

    #[test]
    fn no_records_means_no_significance() {
        let summary = summarize(&edge(&["PMC9"]), &SignificanceTable::new());
        assert_eq!(summary, SignificanceSummary::default());
    }
}
