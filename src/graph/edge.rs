//! Causal edges: identity keys, evidence items and the frozen stored edge

use super::node::EntityId;
use serde::{Deserialize, Serialize};

/// Identity of one causal edge before aggregation
///
/// Two extraction rows producing the same key are merged into one edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub controller: EntityId,
    pub input: EntityId,
    pub output: EntityId,
    pub trigger: String,
    pub label: String,
}

impl EdgeKey {
    pub fn new(
        controller: impl Into<EntityId>,
        input: impl Into<EntityId>,
        output: impl Into<EntityId>,
        trigger: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            controller: controller.into(),
            input: input.into(),
            output: output.into(),
            trigger: trigger.into(),
            label: label.into(),
        }
    }
}

/// One supporting sentence for an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Link to the source article
    pub link: String,
    /// Impact score of the publishing venue
    pub impact: f64,
    /// Sentence as extracted, markup included
    pub markup: String,
}

impl EvidenceItem {
    pub fn new(link: impl Into<String>, impact: f64, markup: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            impact,
            markup: markup.into(),
        }
    }
}

/// Polarity of an edge, derived from its event label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Polarity {
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("positive") {
            Polarity::Positive
        } else if label.contains("negative") {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "Positive",
            Polarity::Negative => "Negative",
            Polarity::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Polarity::Positive),
            "negative" => Ok(Polarity::Negative),
            "neutral" => Ok(Polarity::Neutral),
            other => Err(format!("unknown polarity: {}", other)),
        }
    }
}

/// A stored multi-edge of the causal graph
///
/// Frozen once written: `freq` is the number of deduplicated evidence items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalEdge {
    pub controller: EntityId,
    pub input: EntityId,
    pub output: EntityId,
    pub trigger: String,
    pub label: String,
    pub freq: u64,
    pub evidence: Vec<EvidenceItem>,
    pub seen_in: Vec<String>,
    pub journals: Vec<String>,
    pub impact_factors: Vec<f64>,
}

impl CausalEdge {
    /// Source node of the stored edge
    pub fn source(&self) -> &EntityId {
        &self.controller
    }

    /// Target node of the stored edge
    pub fn target(&self) -> &EntityId {
        &self.output
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::from_label(&self.label)
    }

    pub fn is_self_loop(&self) -> bool {
        self.controller == self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_from_label() {
        assert_eq!(
            Polarity::from_label("Positive_activation"),
            Polarity::Positive
        );
        assert_eq!(
            Polarity::from_label("negative_regulation"),
            Polarity::Negative
        );
        assert_eq!(Polarity::from_label("Association"), Polarity::Neutral);
    }

    #[test]
    fn polarity_parses_case_insensitively() {
        assert_eq!("POSITIVE".parse::<Polarity>(), Ok(Polarity::Positive));
        assert!("sideways".parse::<Polarity>().is_err());
    }

    #[test]
    fn edge_keys_differing_by_label_are_distinct() {
        let a = EdgeKey::new("x:1", "x:2", "x:3", "raises", "Positive_activation");
        let b = EdgeKey::new("x:1", "x:2", "x:3", "raises", "Positive_regulation");
        assert_ne!(a, b);
    }
}
