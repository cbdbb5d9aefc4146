//! Event-reference resolution
//!
//! A participant field may name another extraction row (by event id) instead
//! of an entity. Resolution follows the chain of referenced rows within the
//! same document until a grounded participant is reached.

use super::error::{BuildError, BuildResult};
use super::participant::{GROUNDING_SEPARATOR, NONE_MARKER};
use super::row::{Column, ExtractionRow};
use std::collections::{HashMap, HashSet};

/// Input and output of a referenced event
#[derive(Debug, Clone)]
struct EventParticipants {
    input: String,
    output: String,
}

/// Resolves event references against an (document, event id) index of all rows
#[derive(Debug, Clone, Default)]
pub struct ReferenceResolver {
    /// document → event id → participants
    events: HashMap<String, HashMap<String, EventParticipants>>,
    max_depth: usize,
}

impl ReferenceResolver {
    /// Index every row by (document, event id); later rows win on collision
    pub fn from_rows<'r>(rows: impl IntoIterator<Item = &'r ExtractionRow>, max_depth: usize) -> Self {
        let mut events: HashMap<String, HashMap<String, EventParticipants>> = HashMap::new();
        for row in rows {
            events.entry(row.seen_in.clone()).or_default().insert(
                row.event_id.clone(),
                EventParticipants {
                    input: row.input.clone(),
                    output: row.output.clone(),
                },
            );
        }
        Self { events, max_depth }
    }

    /// True if `reference` needs no further resolution
    pub fn is_resolved(reference: &str) -> bool {
        reference.contains(GROUNDING_SEPARATOR) || reference == NONE_MARKER
    }

    /// Resolve `reference`, found in column `role` of a row from `document`
    ///
    /// An INPUT or CONTROLLER reference is replaced by the referenced event's
    /// OUTPUT, an OUTPUT reference by its INPUT, until the value is grounded
    /// or the "none" marker. Chains longer than the depth bound, or that
    /// revisit a (reference, role) pair, fail with `CycleDetected`.
    pub fn resolve<'s>(&'s self, reference: &'s str, role: Column, document: &str) -> BuildResult<&'s str> {
        let mut current = reference;
        let mut role = role;
        let mut visited: HashSet<(&str, Column)> = HashSet::new();
        let mut hops = 0;

        loop {
            if Self::is_resolved(current) {
                return Ok(current);
            }
            if hops >= self.max_depth || !visited.insert((current, role)) {
                return Err(BuildError::CycleDetected {
                    reference: reference.to_string(),
                    document: document.to_string(),
                    depth: hops,
                });
            }

            let next_role = match role {
                Column::Input | Column::Controller => Column::Output,
                Column::Output => Column::Input,
                other => return Err(BuildError::InvalidResolutionRole(other)),
            };

            let event = self
                .events
                .get(document)
                .and_then(|events| events.get(current))
                .ok_or_else(|| BuildError::UnresolvedReference {
                    event_id: current.to_string(),
                    document: document.to_string(),
                })?;

            current = match next_role {
                Column::Output => &event.output,
                _ => &event.input,
            };
            role = next_role;
            hops += 1;
        }
    }
}
