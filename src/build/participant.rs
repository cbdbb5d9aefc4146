//! Complex participant decomposition
//!
//! A participant field names one entity (`IL6::uniprot:P05231`) or several in
//! set notation (`{IL6::uniprot:P05231, CRP::uniprot:P02741}`). Decomposition
//! yields one `(display text, grounded id)` pair per grounded element.

use super::error::BuildResult;
use regex_lite::Regex;

/// Separator between display text and grounded id in a participant
pub const GROUNDING_SEPARATOR: &str = "::";

/// Participant value meaning "no participant"
pub const NONE_MARKER: &str = "NONE";

/// Separator between elements of a set-notation participant
pub const ELEMENT_SEPARATOR: &str = ", ";

/// One grounded participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant<'a> {
    pub text: &'a str,
    pub id: &'a str,
}

/// Splits participant fields into grounded entities
pub struct ParticipantDecomposer {
    suffix: Regex,
    excluded_namespace: String,
}

impl ParticipantDecomposer {
    pub fn new(excluded_namespace: impl Into<String>) -> BuildResult<Self> {
        Ok(Self {
            suffix: Regex::new(r"(?i)(\.\w+|:\[\w+\])+$")?,
            excluded_namespace: excluded_namespace.into(),
        })
    }

    /// True if `field` mentions the ad-hoc namespace anywhere
    pub fn mentions_excluded(&self, field: &str) -> bool {
        !self.excluded_namespace.is_empty() && field.contains(&self.excluded_namespace)
    }

    /// Decompose one participant field
    ///
    /// The returned iterator is lazy and can be cloned to restart it.
    pub fn decompose<'a>(&'a self, field: &'a str) -> Participants<'a> {
        Participants {
            decomposer: self,
            elements: field
                .trim_matches(|c| c == '{' || c == '}')
                .split(ELEMENT_SEPARATOR),
        }
    }

    /// Decompose several participant fields in order
    pub fn decompose_all<'a>(
        &'a self,
        fields: &'a [&'a str],
    ) -> impl Iterator<Item = Participant<'a>> + Clone + 'a {
        fields.iter().flat_map(move |field| self.decompose(field))
    }

    fn parse_element<'a>(&self, element: &'a str) -> Option<Participant<'a>> {
        if !element.contains(GROUNDING_SEPARATOR) {
            return None;
        }
        let stripped = match self.suffix.find(element) {
            Some(m) => &element[..m.start()],
            None => element,
        };
        if stripped.is_empty() || self.mentions_excluded(stripped) {
            return None;
        }
        let (text, grounded) = stripped.split_once(GROUNDING_SEPARATOR)?;
        let id = grounded.split('.').next().unwrap_or(grounded);
        Some(Participant { text, id })
    }
}

/// Lazy sequence of participants of one field
#[derive(Clone)]
pub struct Participants<'a> {
    decomposer: &'a ParticipantDecomposer,
    elements: std::str::Split<'a, &'static str>,
}

impl<'a> Iterator for Participants<'a> {
    type Item = Participant<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for element in self.elements.by_ref() {
            if let Some(p) = self.decomposer.parse_element(element) {
                return Some(p);
            }
        }
        None
    }
}
