//! Conversion of record values to display-safe text.
//!
//! Lists are joined with `", "` after stringifying each element. Strings are
//! taken verbatim; numbers, booleans and null use their JSON text. Every
//! value of a `NormalizedRecord` is therefore a plain string, which is all
//! the table renderer and the PDF exporter accept.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::fields::{FieldSpec, FIELDS};
use crate::types::Record;

/// A record whose every value is display text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub id: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl NormalizedRecord {
    /// Text of a field; missing fields read as empty.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    /// The descriptor-table columns in display order, with choice values
    /// shown by label.
    pub fn columns(&self) -> impl Iterator<Item = (&'static FieldSpec, &str)> + '_ {
        FIELDS
            .iter()
            .map(move |spec| (spec, spec.display_text(self.get(spec.key))))
    }

    /// Back to a `Record` whose values are all JSON strings.
    pub fn into_record(self) -> Record {
        Record {
            id: self.id,
            fields: self
                .fields
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        }
    }
}

/// Text for a single value.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn normalize(record: &Record) -> NormalizedRecord {
    NormalizedRecord {
        id: record.id.clone(),
        fields: record
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), value_text(v)))
            .collect(),
    }
}

pub fn normalize_all(records: &[Record]) -> Vec<NormalizedRecord> {
    records.iter().map(normalize).collect()
}
