//! Errors and exclusions raised while building the graph

use super::row::Column;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the construction pipeline
///
/// Row-level variants (`Parse`, `UnresolvedReference`, `InvalidResolutionRole`,
/// `CycleDetected`, `GraphAssembly`) cause a single row or edge to be skipped;
/// the pass itself always continues.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Malformed {column} field: {value:?}")]
    Parse { column: Column, value: String },

    #[error("Unresolved event reference {event_id} in document {document}")]
    UnresolvedReference { event_id: String, document: String },

    #[error("Column {0} cannot be resolved as a participant")]
    InvalidResolutionRole(Column),

    #[error("Event reference {reference} in document {document} did not resolve within {depth} steps")]
    CycleDetected {
        reference: String,
        document: String,
        depth: usize,
    },

    #[error("No label for entity {0}")]
    GraphAssembly(String),

    #[error("Missing column {column} in {}", .path.display())]
    MissingColumn { path: PathBuf, column: Column },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex_lite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    /// Short, stable name of the error kind for reporting
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse",
            Self::UnresolvedReference { .. } => "unresolved_reference",
            Self::InvalidResolutionRole(_) => "invalid_resolution_role",
            Self::CycleDetected { .. } => "cycle_detected",
            Self::GraphAssembly(_) => "graph_assembly",
            Self::MissingColumn { .. } => "missing_column",
            Self::Pattern(_) => "pattern",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}

/// Result type for construction operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Why a row or edge was filtered out. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    /// A participant field is empty or written in set notation
    MalformedParticipant,
    /// A participant belongs to the ad-hoc namespace
    AdHocNamespace,
    /// An edge endpoint is on the deny-list
    DenyListed,
}

impl Exclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedParticipant => "malformed_participant",
            Self::AdHocNamespace => "ad_hoc_namespace",
            Self::DenyListed => "deny_listed",
        }
    }
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
