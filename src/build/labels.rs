//! Entity display labels
//!
//! Every decomposed participant contributes its display text to a per-id
//! frequency table. Ids whose accession appears in the UniProt index count
//! the curated protein name instead of the extracted text.

use super::error::BuildResult;
use crate::graph::EntityId;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

/// Parse UniProt FASTA headers into an accession → description map
///
/// Only Swiss-Prot headers (`>sp|ACC|NAME description OS=...`) are read.
pub fn parse_uniprot(fasta: &str) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for line in fasta.lines() {
        if !line.starts_with(">sp") {
            continue;
        }
        let prefix = line.split("OS=").next().unwrap_or(line);
        let Some((triplet, description)) = prefix.split_once(' ') else {
            continue;
        };
        let Some(accession) = triplet.split('|').nth(1) else {
            continue;
        };
        names.insert(accession.to_string(), description.trim().to_string());
    }
    names
}

pub fn read_uniprot(path: &Path) -> BuildResult<HashMap<String, String>> {
    let text = std::fs::read_to_string(path)?;
    let names = parse_uniprot(&text);
    info!(entries = names.len(), "UniProt descriptions loaded");
    Ok(names)
}

/// Observed descriptions per entity, with counts in first-seen order
#[derive(Debug, Clone, Default)]
pub struct DescriptionTable {
    uniprot: HashMap<String, String>,
    counts: BTreeMap<EntityId, Vec<(String, usize)>>,
}

impl DescriptionTable {
    pub fn new(uniprot: HashMap<String, String>) -> Self {
        Self {
            uniprot,
            counts: BTreeMap::new(),
        }
    }

    /// Count one observation of `text` as a description of `id`
    pub fn observe(&mut self, id: &str, text: &str) {
        let id = EntityId::from(id);
        let description = match self.uniprot.get(id.accession()) {
            Some(name) => name.clone(),
            None => text.to_lowercase().trim().to_string(),
        };

        let counts = self.counts.entry(id).or_default();
        match counts.iter_mut().find(|(d, _)| *d == description) {
            Some((_, n)) => *n += 1,
            None => counts.push((description, 1)),
        }
    }

    /// Most frequent description; ties go to the first one seen
    pub fn label_for(&self, id: &EntityId) -> Option<&str> {
        let counts = self.counts.get(id)?;
        let mut best: Option<&(String, usize)> = None;
        for entry in counts {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(d, _)| d.as_str())
    }

    /// All distinct descriptions of `id`, first seen first
    pub fn synonyms(&self, id: &EntityId) -> Vec<String> {
        self.counts
            .get(id)
            .map(|c| c.iter().map(|(d, _)| d.clone()).collect())
            .unwrap_or_default()
    }

    /// Synonyms of the given entities; ids never observed are left out
    pub fn synonym_table<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a EntityId>,
    ) -> BTreeMap<EntityId, Vec<String>> {
        ids.into_iter()
            .filter_map(|id| {
                let counts = self.counts.get(id)?;
                Some((id.clone(), counts.iter().map(|(d, _)| d.clone()).collect()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FASTA: &str = "\
>sp|P05231|IL6_HUMAN Interleukin-6 OS=Homo sapiens OX=9606 GN=IL6 PE=1 SV=1
MNSFSTSAFGPVAFSLGLLLVLPAAFPAPV
>tr|A0A000|X_HUMAN Unreviewed thing OS=Homo sapiens
MNSF
";

    #[test]
    fn parses_swissprot_headers() {
        let names = parse_uniprot(FASTA);
        assert_eq!(names.len(), 1);
        assert_eq!(names["P05231"], "Interleukin-6");
    }

    #[test]
    fn most_frequent_description_wins() {
        let mut table = DescriptionTable::default();
        table.observe("mesh:D1", "Frailty");
        table.observe("mesh:D1", "frail elderly");
        table.observe("mesh:D1", " FRAIL elderly ");
        assert_eq!(table.label_for(&"mesh:D1".into()), Some("frail elderly"));
        assert_eq!(
            table.synonyms(&"mesh:D1".into()),
            vec!["frailty".to_string(), "frail elderly".to_string()]
        );
    }

    #[test]
    fn ties_go_to_first_seen() {
        let mut table = DescriptionTable::default();
        table.observe("mesh:D1", "b");
        table.observe("mesh:D1", "a");
        assert_eq!(table.label_for(&"mesh:D1".into()), Some("b"));
    }

    #[test]
    fn uniprot_name_replaces_extracted_text() {
        let mut table = DescriptionTable::new(parse_uniprot(FASTA));
        table.observe("uniprot:P05231", "IL6");
        table.observe("uniprot:P05231", "IL-6");
        assert_eq!(table.label_for(&"uniprot:P05231".into()), Some("Interleukin-6"));
        assert_eq!(table.synonyms(&"uniprot:P05231".into()).len(), 1);
    }

    #[test]
    fn synonym_table_covers_requested_ids_only() {
        let mut table = DescriptionTable::default();
        table.observe("x:1", "one");
        table.observe("x:2", "two");
        let kept = [EntityId::from("x:2"), EntityId::from("x:3")];

        let synonyms = table.synonym_table(&kept);
        assert_eq!(synonyms.len(), 1);
        assert_eq!(synonyms[&EntityId::from("x:2")], vec!["two".to_string()]);
    }

    #[test]
    fn unknown_id_has_no_label() {
        let table = DescriptionTable::default();
        assert_eq!(table.label_for(&"x:1".into()), None);
        assert!(table.synonyms(&"x:1".into()).is_empty());
    }
}
