//! Extraction rows and the tab-separated reader that produces them

use super::documents::DocumentResolver;
use super::error::{BuildError, BuildResult};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Columns of the extraction files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Controller,
    Input,
    Output,
    Triggers,
    EventLabel,
    EventId,
    SeenIn,
    Seen,
    Evidence,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Controller,
        Column::Input,
        Column::Output,
        Column::Triggers,
        Column::EventLabel,
        Column::EventId,
        Column::SeenIn,
        Column::Seen,
        Column::Evidence,
    ];

    /// Header name in the extraction files
    pub fn header(&self) -> &'static str {
        match self {
            Column::Controller => "CONTROLLER",
            Column::Input => "INPUT",
            Column::Output => "OUTPUT",
            Column::Triggers => "TRIGGERS",
            Column::EventLabel => "EVENT LABEL",
            Column::EventId => "EVENT ID",
            Column::SeenIn => "SEEN IN",
            Column::Seen => "SEEN",
            Column::Evidence => "EVIDENCE",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

/// One line of extraction output. Immutable once read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionRow {
    pub controller: String,
    pub input: String,
    pub output: String,
    pub triggers: String,
    pub event_label: String,
    pub event_id: String,
    /// Document the row was seen in (normalized)
    pub seen_in: String,
    /// Raw frequency count, as written
    pub seen: String,
    /// Evidence sentences joined by the evidence separator
    pub evidence: String,
    /// Journal of the source document, when known from the bibliography
    pub journal: Option<String>,
    /// Link to the source document
    pub link: String,
}

impl ExtractionRow {
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Controller => &self.controller,
            Column::Input => &self.input,
            Column::Output => &self.output,
            Column::Triggers => &self.triggers,
            Column::EventLabel => &self.event_label,
            Column::EventId => &self.event_id,
            Column::SeenIn => &self.seen_in,
            Column::Seen => &self.seen,
            Column::Evidence => &self.evidence,
        }
    }

    /// The three participant fields, in (controller, input, output) order
    pub fn participants(&self) -> [&str; 3] {
        [&self.controller, &self.input, &self.output]
    }

    /// Raw frequency count
    pub fn frequency(&self) -> BuildResult<u64> {
        self.seen.trim().parse().map_err(|_| BuildError::Parse {
            column: Column::Seen,
            value: self.seen.clone(),
        })
    }

    pub fn evidence_sentences<'a>(&'a self, separator: &'a str) -> impl Iterator<Item = &'a str> {
        self.evidence.split(separator)
    }

    /// Key used to look up the impact factor: journal if known, else the document
    pub fn impact_source(&self) -> &str {
        match &self.journal {
            Some(journal) if !journal.is_empty() => journal,
            _ => self.seen_in.trim(),
        }
    }
}

/// Reads extraction files into rows
///
/// Grounding rewrites and document normalization are applied as each row
/// is created.
pub struct RowReader<'a> {
    rewrites: &'a BTreeMap<String, String>,
    documents: &'a DocumentResolver,
}

impl<'a> RowReader<'a> {
    pub fn new(rewrites: &'a BTreeMap<String, String>, documents: &'a DocumentResolver) -> Self {
        Self { rewrites, documents }
    }

    /// Parse tab-separated text with a header line
    ///
    /// `file_name` supplies the fallback document id for rows whose
    /// SEEN IN value is not a valid PMCID.
    pub fn read_str(&self, text: &str, file_name: &str) -> BuildResult<Vec<ExtractionRow>> {
        let mut lines = text.lines();
        let header = match lines.next() {
            Some(h) => h.trim_end_matches('\r'),
            None => return Ok(Vec::new()),
        };

        let positions: HashMap<&str, usize> = header
            .split('\t')
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let mut columns: HashMap<Column, usize> = HashMap::new();
        for column in Column::ALL {
            match positions.get(column.header()) {
                Some(&i) => {
                    columns.insert(column, i);
                }
                None => {
                    return Err(BuildError::MissingColumn {
                        path: PathBuf::from(file_name),
                        column,
                    })
                }
            }
        }

        let mut rows = Vec::new();
        for (line_no, line) in lines.enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let field = |column: Column| -> Option<&str> {
                columns.get(&column).and_then(|&i| fields.get(i).copied())
            };

            let values: Option<Vec<&str>> = Column::ALL.iter().map(|&c| field(c)).collect();
            let Some(values) = values else {
                debug!(file = file_name, line = line_no + 2, "short line skipped");
                continue;
            };

            let Some(document) = self.documents.annotate(values[6], file_name) else {
                debug!(file = file_name, line = line_no + 2, "document without DOI skipped");
                continue;
            };

            rows.push(ExtractionRow {
                controller: self.rewrite(values[0]),
                input: self.rewrite(values[1]),
                output: self.rewrite(values[2]),
                triggers: values[3].to_string(),
                event_label: values[4].to_string(),
                event_id: values[5].to_string(),
                seen_in: document.seen_in,
                seen: values[7].to_string(),
                evidence: values[8].to_string(),
                journal: document.journal,
                link: document.link,
            });
        }

        Ok(rows)
    }

    pub fn read_file(&self, path: &Path) -> BuildResult<Vec<ExtractionRow>> {
        let text = std::fs::read_to_string(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.read_str(&text, &file_name).map_err(|e| match e {
            BuildError::MissingColumn { column, .. } => BuildError::MissingColumn {
                path: path.to_path_buf(),
                column,
            },
            other => other,
        })
    }

    /// Read every `*.tsv` file of the given directories
    ///
    /// Unreadable files are logged and skipped.
    pub fn read_dirs(&self, dirs: &[PathBuf]) -> BuildResult<Vec<ExtractionRow>> {
        let mut rows = Vec::new();
        for dir in dirs {
            let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext == "tsv"))
                .collect();
            paths.sort();

            for path in paths {
                match self.read_file(&path) {
                    Ok(file_rows) => {
                        debug!(path = %path.display(), rows = file_rows.len(), "file parsed");
                        rows.extend(file_rows);
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "file skipped"),
                }
            }
        }
        info!(rows = rows.len(), "extraction rows read");
        Ok(rows)
    }

    fn rewrite(&self, participant: &str) -> String {
        self.rewrites
            .iter()
            .fold(participant.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}
