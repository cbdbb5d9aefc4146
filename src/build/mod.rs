//! Graph-construction pipeline
//!
//! Turns extraction rows into a deduplicated causal multigraph:
//!
//! - [`row`]: tab-separated extraction files → [`ExtractionRow`]s
//! - [`resolver`]: event references → grounded participants
//! - [`participant`]: set-notation fields → (text, id) pairs
//! - [`evidence`]: markup stripping and sentence dedup
//! - [`aggregator`]: per-edge accumulation
//! - [`builder`]: the batch pass tying it together

pub mod aggregator;
pub mod builder;
pub mod documents;
mod error;
pub mod evidence;
pub mod impact;
pub mod labels;
pub mod participant;
pub mod resolver;
pub mod row;

pub use aggregator::{EdgeAggregator, EdgeObservation, EdgeRecord};
pub use builder::{BuildOutput, BuildReport, GraphBuilder};
pub use documents::{load_doi_map, parse_doi_map, BibEntry, DocumentInfo, DocumentResolver};
pub use error::{BuildError, BuildResult, Exclusion};
pub use evidence::{canonical_sentence, strip_markup, EvidenceSet, MarkupStripper};
pub use impact::{ImpactFactors, ImpactLookup, NoImpactFactors};
pub use labels::{parse_uniprot, read_uniprot, DescriptionTable};
pub use participant::{Participant, ParticipantDecomposer, Participants};
pub use resolver::ReferenceResolver;
pub use row::{Column, ExtractionRow, RowReader};
