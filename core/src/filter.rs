//! Client-side filtering and patient-name resolution.

use crate::types::Record;

/// Optional case-insensitive substring filters for the browse view.
///
/// Blank filters are treated as absent. When both are set a record must
/// match both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    name: Option<String>,
    hospital: Option<String>,
}

impl RecordFilter {
    pub fn new(name: &str, hospital: &str) -> Self {
        Self {
            name: needle(name),
            hospital: needle(hospital),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.hospital.is_none()
    }

    pub fn matches(&self, record: &Record) -> bool {
        contains(&self.name, &record.name()) && contains(&self.hospital, &record.hospital())
    }

    /// Keep the matching records, preserving API order.
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn needle(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn contains(needle: &Option<String>, haystack: &str) -> bool {
    needle
        .as_deref()
        .map_or(true, |n| haystack.to_lowercase().contains(n))
}

/// Outcome of looking a patient up by exact name.
#[derive(Debug, Clone, PartialEq)]
pub enum NameMatch {
    NotFound,
    Unique(Record),
    /// Several records share the name, in API order. The caller must let the
    /// user pick one.
    Ambiguous(Vec<Record>),
}

impl NameMatch {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NameMatch::NotFound)
    }
}

/// Resolve `name` against `records` by exact equality.
pub fn resolve_by_name(records: Vec<Record>, name: &str) -> NameMatch {
    let mut matches: Vec<Record> = records.into_iter().filter(|r| r.name() == name).collect();
    match matches.len() {
        0 => NameMatch::NotFound,
        1 => NameMatch::Unique(matches.remove(0)),
        _ => NameMatch::Ambiguous(matches),
    }
}
