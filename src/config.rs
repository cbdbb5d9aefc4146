//! Build and query configuration
//!
//! Every field has a default, so an empty (or absent) YAML file yields the
//! standard behaviour. Example:
//!
//! ```yaml
//! build:
//!   deny_list: ["uniprot:P31944"]
//!   max_resolution_depth: 50
//! query:
//!   neighbor_limit: 100
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Which impact-factor metric to attach to evidence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactMetric {
    #[default]
    Sjr,
    Hindex,
}

/// Settings for the graph-construction pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Entity ids that must never become nodes or edge endpoints
    pub deny_list: BTreeSet<String>,
    /// Namespace prefix of ad-hoc (ungrounded) entities
    pub excluded_namespace: String,
    /// Grounding ids replaced verbatim in participant fields
    pub grounding_rewrites: BTreeMap<String, String>,
    /// Longest event-reference chain followed before giving up
    pub max_resolution_depth: usize,
    /// Separator between sentences in the EVIDENCE column
    pub evidence_separator: String,
    /// Substring of event labels denoting association events
    pub association_marker: String,
    /// EVENT LABEL value of significance rows
    pub significance_label: String,
    pub impact_metric: ImpactMetric,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            deny_list: ["uniprot:P31944", "pubchem:6234", "uniprot:O14896"]
                .into_iter()
                .map(String::from)
                .collect(),
            excluded_namespace: "uaz:".to_string(),
            grounding_rewrites: [("frailty:FR00001".to_string(), "mesh:D000073496".to_string())]
                .into_iter()
                .collect(),
            max_resolution_depth: 50,
            evidence_separator: " ++++ ".to_string(),
            association_marker: "ssociation".to_string(),
            significance_label: "Significance".to_string(),
            impact_metric: ImpactMetric::default(),
        }
    }
}

impl BuildConfig {
    pub fn is_denied(&self, id: &str) -> bool {
        self.deny_list.contains(id)
    }
}

/// Settings for the subgraph query engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum number of edges returned by a neighbourhood query
    pub neighbor_limit: usize,
    /// Token joining composite event labels on stored edges
    pub label_separator: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            neighbor_limit: 100,
            label_separator: " ++++ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub build: BuildConfig,
    pub query: QueryConfig,
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_yaml_file(p),
            None => Ok(Self::default()),
        }
    }
}
