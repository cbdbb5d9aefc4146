//! GraphBuilder: the batch construction pass
//!
//! Consumes every extraction row once and emits an immutable `CausalGraph`.
//! One bad row never aborts the pass: it is skipped, logged and counted in
//! the `BuildReport`.

use super::aggregator::{EdgeAggregator, EdgeObservation};
use super::documents::DocumentResolver;
use super::error::{BuildError, BuildResult, Exclusion};
use super::impact::{ImpactLookup, NoImpactFactors};
use super::labels::DescriptionTable;
use super::participant::{
    Participant, ParticipantDecomposer, ELEMENT_SEPARATOR, GROUNDING_SEPARATOR, NONE_MARKER,
};
use super::resolver::ReferenceResolver;
use super::row::{Column, ExtractionRow, RowReader};
use crate::config::BuildConfig;
use crate::graph::{
    CausalEdge, CausalGraph, EdgeKey, Entity, EntityId, GraphMetadata, SignificanceRecord,
    SignificanceTable,
};
use chrono::Utc;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Counters describing one build pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub rows_read: usize,
    /// Rows consumed into the significance side table
    pub significance_rows: usize,
    pub rows_excluded: BTreeMap<Exclusion, usize>,
    /// Rows skipped, by error kind
    pub rows_skipped: BTreeMap<&'static str, usize>,
    /// Distinct edge keys accumulated before finalization
    pub edge_keys: usize,
    pub edges_denied: usize,
    pub edges_unlabeled: usize,
    pub edges_stored: usize,
}

impl BuildReport {
    pub fn excluded(&self) -> usize {
        self.rows_excluded.values().sum()
    }

    pub fn skipped(&self) -> usize {
        self.rows_skipped.values().sum()
    }

    fn exclude(&mut self, reason: Exclusion) {
        *self.rows_excluded.entry(reason).or_insert(0) += 1;
    }

    fn skip(&mut self, error: &BuildError) {
        *self.rows_skipped.entry(error.kind()).or_insert(0) += 1;
    }
}

/// Result of a build pass
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub graph: CausalGraph,
    pub report: BuildReport,
}

pub struct GraphBuilder {
    config: BuildConfig,
    decomposer: ParticipantDecomposer,
    documents: DocumentResolver,
    impact: Box<dyn ImpactLookup>,
    uniprot: HashMap<String, String>,
}

impl GraphBuilder {
    pub fn new(config: BuildConfig) -> BuildResult<Self> {
        Ok(Self {
            decomposer: ParticipantDecomposer::new(config.excluded_namespace.clone())?,
            documents: DocumentResolver::new()?,
            impact: Box::new(NoImpactFactors),
            uniprot: HashMap::new(),
            config,
        })
    }

    pub fn with_documents(mut self, documents: DocumentResolver) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_impact(mut self, impact: impl ImpactLookup + 'static) -> Self {
        self.impact = Box::new(impact);
        self
    }

    /// UniProt accession → description index for entity labels
    pub fn with_uniprot(mut self, uniprot: HashMap<String, String>) -> Self {
        self.uniprot = uniprot;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn documents(&self) -> &DocumentResolver {
        &self.documents
    }

    /// Read every extraction file under the given directories
    pub fn read_dirs(&self, dirs: &[PathBuf]) -> BuildResult<Vec<ExtractionRow>> {
        RowReader::new(&self.config.grounding_rewrites, &self.documents).read_dirs(dirs)
    }

    /// Read extraction rows from tab-separated text
    pub fn read_str(&self, text: &str, file_name: &str) -> BuildResult<Vec<ExtractionRow>> {
        RowReader::new(&self.config.grounding_rewrites, &self.documents).read_str(text, file_name)
    }

    /// Run the construction pass over all rows
    pub fn build(&self, rows: &[ExtractionRow]) -> BuildOutput {
        let mut report = BuildReport {
            rows_read: rows.len(),
            ..Default::default()
        };

        let significance = self.significance_table(rows, &mut report);
        let resolver = ReferenceResolver::from_rows(rows, self.config.max_resolution_depth);

        // Ad-hoc namespace rows build no edges but still describe their
        // grounded participants
        let mut kept = Vec::with_capacity(rows.len());
        let mut described = Vec::with_capacity(rows.len());
        for row in rows {
            if row.event_label == self.config.significance_label {
                continue;
            }
            match self.exclusion(row) {
                Some(reason) => {
                    debug!(event = %row.event_id, document = %row.seen_in, %reason, "row excluded");
                    report.exclude(reason);
                    if reason == Exclusion::AdHocNamespace {
                        described.push(row);
                    }
                }
                None => {
                    kept.push(row);
                    described.push(row);
                }
            }
        }

        let descriptions = self.describe(&described);

        let mut aggregator = EdgeAggregator::new();
        for row in &kept {
            if let Err(e) = self.accumulate(row, &resolver, &mut aggregator) {
                warn!(
                    event = %row.event_id,
                    document = %row.seen_in,
                    kind = e.kind(),
                    error = %e,
                    "row skipped"
                );
                report.skip(&e);
            }
        }
        report.edge_keys = aggregator.len();

        let graph = self.finalize(aggregator, &descriptions, significance, &mut report);
        info!(
            rows = report.rows_read,
            excluded = report.excluded(),
            skipped = report.skipped(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph built"
        );
        BuildOutput { graph, report }
    }

    fn significance_table(&self, rows: &[ExtractionRow], report: &mut BuildReport) -> SignificanceTable {
        let mut table = SignificanceTable::new();
        for row in rows
            .iter()
            .filter(|r| r.event_label == self.config.significance_label)
        {
            report.significance_rows += 1;
            table
                .entry(self.documents.resolve(&row.seen_in))
                .or_default()
                .push(SignificanceRecord::new(row.input.to_lowercase(), row.output.clone()));
        }
        table
    }

    /// Why `row` must not take part in edge construction, if it must not
    pub fn exclusion(&self, row: &ExtractionRow) -> Option<Exclusion> {
        let fields = row.participants();
        if fields
            .iter()
            .any(|f| f.is_empty() || f.starts_with('{') || f.ends_with('}'))
        {
            return Some(Exclusion::MalformedParticipant);
        }
        if fields.iter().any(|f| self.decomposer.mentions_excluded(f)) {
            return Some(Exclusion::AdHocNamespace);
        }
        None
    }

    fn describe(&self, rows: &[&ExtractionRow]) -> DescriptionTable {
        let mut table = DescriptionTable::new(self.uniprot.clone());
        for row in rows {
            for field in row.participants() {
                if field == NONE_MARKER {
                    continue;
                }
                for participant in self.decomposer.decompose(field) {
                    table.observe(participant.id, participant.text);
                }
            }
        }
        table
    }

    fn accumulate(
        &self,
        row: &ExtractionRow,
        resolver: &ReferenceResolver,
        aggregator: &mut EdgeAggregator,
    ) -> BuildResult<()> {
        let frequency = row.frequency()?;
        let controller = resolver.resolve(&row.controller, Column::Controller, &row.seen_in)?;
        let input = resolver.resolve(&row.input, Column::Input, &row.seen_in)?;
        let output = resolver.resolve(&row.output, Column::Output, &row.seen_in)?;

        let controllers: Vec<Participant<'_>> = self.decomposer.decompose(controller).collect();
        let keys: Vec<EdgeKey> = if !controllers.is_empty() {
            let inputs = self.decomposer.decompose(input);
            let outputs = self.decomposer.decompose(output);
            let mut keys = Vec::new();
            for c in &controllers {
                for i in inputs.clone() {
                    for o in outputs.clone() {
                        keys.push(EdgeKey::new(
                            c.id,
                            i.id,
                            o.id,
                            row.triggers.as_str(),
                            row.event_label.as_str(),
                        ));
                    }
                }
            }
            keys
        } else if row.event_label.contains(self.config.association_marker.as_str()) {
            self.association_key(row).into_iter().collect()
        } else {
            Vec::new()
        };

        if keys.is_empty() {
            return Ok(());
        }

        let document = self.documents.resolve(&row.seen_in);
        let observation = EdgeObservation {
            frequency,
            document: &document,
            link: &row.link,
            journal: row.journal.as_deref().filter(|j| !j.is_empty()),
            impact: self.impact.impact(row.impact_source()),
            // A blank sentence still counts once towards the edge frequency
            sentences: row
                .evidence_sentences(&self.config.evidence_separator)
                .collect(),
        };
        for key in keys {
            aggregator.add(key, &observation);
        }
        Ok(())
    }

    /// Reciprocal edge between the first two participants of an association
    fn association_key(&self, row: &ExtractionRow) -> Option<EdgeKey> {
        let grounded = row
            .input
            .split(ELEMENT_SEPARATOR)
            .filter(|p| p.contains(GROUNDING_SEPARATOR))
            .count();
        if grounded < 2 {
            return None;
        }
        let mut participants = self.decomposer.decompose(&row.input);
        let controller = participants.next()?;
        let output = participants.next()?;
        (controller.id != output.id).then(|| {
            EdgeKey::new(
                controller.id,
                controller.id,
                output.id,
                row.triggers.as_str(),
                row.event_label.as_str(),
            )
        })
    }

    fn finalize(
        &self,
        aggregator: EdgeAggregator,
        descriptions: &DescriptionTable,
        significance: SignificanceTable,
        report: &mut BuildReport,
    ) -> CausalGraph {
        let mut graph = CausalGraph::new();

        for (key, record) in aggregator.into_records() {
            if self.config.is_denied(key.controller.as_str())
                || self.config.is_denied(key.output.as_str())
            {
                debug!(
                    controller = %key.controller,
                    output = %key.output,
                    reason = %Exclusion::DenyListed,
                    "edge discarded"
                );
                report.edges_denied += 1;
                continue;
            }

            let (controller_label, output_label) = match endpoint_labels(&key, descriptions) {
                Ok(labels) => labels,
                Err(e) => {
                    warn!(controller = %key.controller, output = %key.output, error = %e, "edge dropped");
                    report.edges_unlabeled += 1;
                    continue;
                }
            };

            let EdgeKey {
                controller,
                input,
                output,
                trigger,
                label,
            } = key;

            graph
                .nodes
                .entry(controller.clone())
                .or_insert_with(|| Entity::new(controller.clone(), controller_label));
            graph
                .nodes
                .entry(output.clone())
                .or_insert_with(|| Entity::new(output.clone(), output_label));

            let trigger = if trigger.trim().is_empty() {
                label.clone()
            } else {
                trigger
            };

            graph.edges.push(CausalEdge {
                controller,
                input,
                output,
                trigger,
                label,
                freq: record.evidence.len() as u64,
                evidence: record.evidence.into_items(),
                seen_in: record.seen_in.into_iter().collect(),
                journals: record.journals.into_iter().collect(),
                impact_factors: record.impact_factors,
            });
        }

        report.edges_stored = graph.edge_count();
        graph.significance = significance;
        graph.synonyms = descriptions.synonym_table(graph.nodes.keys());
        graph.metadata = GraphMetadata {
            built_at: Some(Utc::now()),
            rows_read: report.rows_read,
            rows_excluded: report.excluded(),
            rows_skipped: report.skipped(),
            edges_dropped: report.edges_denied + report.edges_unlabeled,
        };
        graph
    }
}

fn endpoint_labels(key: &EdgeKey, descriptions: &DescriptionTable) -> BuildResult<(String, String)> {
    let label = |id: &EntityId| {
        descriptions
            .label_for(id)
            .map(str::to_string)
            .ok_or_else(|| BuildError::GraphAssembly(id.to_string()))
    };
    Ok((label(&key.controller)?, label(&key.output)?))
}
