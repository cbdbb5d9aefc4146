//! Provenance document resolution
//!
//! Normalizes the SEEN IN column, attaches journal and link metadata from an
//! optional xDD bibliography, and maps documents to the id recorded as edge
//! provenance (PMCID when known, otherwise DOI, otherwise the raw key).

use super::error::BuildResult;
use regex_lite::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

const PMC_ARTICLE_URL: &str = "https://www.ncbi.nlm.nih.gov/pmc/articles/";

/// Bibliographic metadata of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub journal: String,
    pub link: String,
    pub doi: Option<String>,
}

/// Document metadata attached to a row as it is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub seen_in: String,
    pub journal: Option<String>,
    pub link: String,
}

#[derive(Debug, Deserialize)]
struct XddIdentifier {
    #[serde(rename = "type")]
    kind: String,
    id: String,
}

#[derive(Debug, Deserialize)]
struct XddName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct XddJournal {
    name: XddName,
}

#[derive(Debug, Deserialize)]
struct XddLink {
    url: String,
}

#[derive(Debug, Deserialize)]
struct XddRecord {
    identifier: Vec<XddIdentifier>,
    journal: XddJournal,
    link: Vec<XddLink>,
}

pub struct DocumentResolver {
    pmcid: Regex,
    doi: Regex,
    bibliography: HashMap<String, BibEntry>,
    doi_to_pmcid: HashMap<String, String>,
}

impl DocumentResolver {
    pub fn new() -> BuildResult<Self> {
        Ok(Self {
            pmcid: Regex::new(r"(?i)^PMC[1-9]\d{0,6}$")?,
            doi: Regex::new(r"(?i)10.\d{4,9}/[-._;()/:A-Z0-9]+")?,
            bibliography: HashMap::new(),
            doi_to_pmcid: HashMap::new(),
        })
    }

    pub fn with_bibliography(mut self, bibliography: HashMap<String, BibEntry>) -> Self {
        self.bibliography = bibliography;
        self
    }

    pub fn with_doi_map(mut self, doi_to_pmcid: HashMap<String, String>) -> Self {
        self.doi_to_pmcid = doi_to_pmcid;
        self
    }

    pub fn is_pmcid(&self, s: &str) -> bool {
        self.pmcid.is_match(s)
    }

    /// Normalize a row's SEEN IN value and attach bibliographic metadata
    ///
    /// Returns `None` when the bibliography knows the document but has no
    /// DOI for it; such rows are dropped.
    pub fn annotate(&self, raw_seen_in: &str, file_name: &str) -> Option<DocumentInfo> {
        let seen_in = if raw_seen_in == "PMC0" || !self.is_pmcid(raw_seen_in) {
            file_name.split('-').next().unwrap_or(file_name).to_string()
        } else {
            raw_seen_in.to_string()
        };

        match self.bibliography.get(bib_key(&seen_in)) {
            Some(entry) => {
                entry.doi.as_ref()?;
                Some(DocumentInfo {
                    seen_in,
                    journal: Some(entry.journal.clone()),
                    link: entry.link.clone(),
                })
            }
            None => {
                let link = format!("{}{}", PMC_ARTICLE_URL, seen_in);
                Some(DocumentInfo {
                    seen_in,
                    journal: None,
                    link,
                })
            }
        }
    }

    /// Document id recorded as provenance for a row
    pub fn resolve(&self, seen_in: &str) -> String {
        if self.is_pmcid(seen_in) {
            return seen_in.to_string();
        }
        let key = bib_key(seen_in);
        match self.bibliography.get(key).and_then(|e| e.doi.as_ref()) {
            Some(doi) => self
                .doi_to_pmcid
                .get(doi)
                .cloned()
                .unwrap_or_else(|| doi.clone()),
            None => key.to_string(),
        }
    }

    /// Parse an xDD bibliography export
    pub fn parse_bibliography(&self, json: &str) -> BuildResult<HashMap<String, BibEntry>> {
        let records: Vec<XddRecord> = serde_json::from_str(json)?;
        let mut entries = HashMap::new();

        for record in records {
            let mut key = None;
            let mut doi = None;
            for identifier in record.identifier {
                match identifier.kind.as_str() {
                    "_xddid" => key = Some(identifier.id),
                    "doi" => doi = Some(identifier.id),
                    _ => {}
                }
            }
            let Some(key) = key else {
                continue;
            };

            let link = record
                .link
                .into_iter()
                .next()
                .map(|l| l.url)
                .unwrap_or_default();
            let doi = doi.or_else(|| self.doi.find(&link).map(|m| m.as_str().to_string()));

            entries.insert(
                key,
                BibEntry {
                    journal: record.journal.name.name,
                    link,
                    doi,
                },
            );
        }

        info!(entries = entries.len(), "bibliography parsed");
        Ok(entries)
    }

    pub fn load_bibliography(&self, path: &Path) -> BuildResult<HashMap<String, BibEntry>> {
        let text = std::fs::read_to_string(path)?;
        self.parse_bibliography(&text)
    }
}

/// Bibliography key of a document: its id without the three-letter prefix
fn bib_key(seen_in: &str) -> &str {
    seen_in.get(3..).unwrap_or("")
}

/// Parse a comma-separated PMC id table with `DOI` and `PMCID` columns
pub fn parse_doi_map(csv: &str) -> HashMap<String, String> {
    let mut lines = csv.lines();
    let Some(header) = lines.next() else {
        return HashMap::new();
    };
    let header = split_csv_line(header);
    let doi_col = header.iter().position(|h| h == "DOI");
    let pmcid_col = header.iter().position(|h| h == "PMCID");
    let (Some(doi_col), Some(pmcid_col)) = (doi_col, pmcid_col) else {
        return HashMap::new();
    };

    lines
        .map(split_csv_line)
        .filter_map(|fields| {
            let doi = fields.get(doi_col)?;
            let pmcid = fields.get(pmcid_col)?;
            (!doi.is_empty() && !pmcid.is_empty()).then(|| (doi.clone(), pmcid.clone()))
        })
        .collect()
}

pub fn load_doi_map(path: &Path) -> BuildResult<HashMap<String, String>> {
    let text = std::fs::read_to_string(path)?;
    let map = parse_doi_map(&text);
    info!(entries = map.len(), "DOI to PMCID map loaded");
    Ok(map)
}

/// Split one CSV line, honouring double-quoted fields
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
