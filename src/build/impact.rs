//! Journal impact-factor lookup

use super::error::BuildResult;
use crate::config::ImpactMetric;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Scores a publication or journal
pub trait ImpactLookup: Send + Sync {
    /// Impact score for `source`, 0.0 when unknown
    fn impact(&self, source: &str) -> f64;
}

/// Lookup used when no impact table is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImpactFactors;

impl ImpactLookup for NoImpactFactors {
    fn impact(&self, _source: &str) -> f64 {
        0.0
    }
}

/// Impact-factor tables: publication → journal, journal → metric
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImpactFactors {
    journals: HashMap<String, String>,
    sjr: HashMap<String, f64>,
    hindex: HashMap<String, f64>,
    #[serde(skip)]
    metric: ImpactMetric,
}

impl ImpactFactors {
    pub fn from_json(json: &str) -> BuildResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> BuildResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let factors = Self::from_json(&text)?;
        info!(
            publications = factors.journals.len(),
            journals = factors.sjr.len().max(factors.hindex.len()),
            "impact factors loaded"
        );
        Ok(factors)
    }

    pub fn with_metric(mut self, metric: ImpactMetric) -> Self {
        self.metric = metric;
        self
    }

    fn scores(&self) -> &HashMap<String, f64> {
        match self.metric {
            ImpactMetric::Sjr => &self.sjr,
            ImpactMetric::Hindex => &self.hindex,
        }
    }
}

impl ImpactLookup for ImpactFactors {
    fn impact(&self, source: &str) -> f64 {
        let key = self.journals.get(source).map(String::as_str).unwrap_or(source);
        self.scores().get(key).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "journals": {"PMC100": "Cytokine", "PMC200": "Missing Journal"},
        "sjr": {"Cytokine": 1.25, "Obscure": 0.3},
        "hindex": {"Cytokine": 120.0}
    }"#;

    #[test]
    fn publication_maps_through_journal() {
        let factors = ImpactFactors::from_json(TABLE).unwrap();
        assert_eq!(factors.impact("PMC100"), 1.25);
    }

    #[test]
    fn journal_name_is_looked_up_directly() {
        let factors = ImpactFactors::from_json(TABLE).unwrap();
        assert_eq!(factors.impact("Obscure"), 0.3);
    }

    #[test]
    fn unknown_sources_score_zero() {
        let factors = ImpactFactors::from_json(TABLE).unwrap();
        assert_eq!(factors.impact("PMC200"), 0.0);
        assert_eq!(factors.impact("PMC999"), 0.0);
        assert_eq!(NoImpactFactors.impact("PMC100"), 0.0);
    }

    #[test]
    fn metric_selects_table() {
        let factors = ImpactFactors::from_json(TABLE)
            .unwrap()
            .with_metric(ImpactMetric::Hindex);
        assert_eq!(factors.impact("PMC100"), 120.0);
        assert_eq!(factors.impact("Obscure"), 0.0);
    }
}
