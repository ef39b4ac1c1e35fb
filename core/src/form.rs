//! Create/update form state driven by the field descriptor table.

use chrono::NaiveDate;

use crate::fields::{FieldError, FieldKind, FieldSpec, FIELDS};
use crate::types::Record;

/// A record being edited field by field.
///
/// Every descriptor field always holds a value: blank forms start from the
/// field defaults, edit forms from the stored record. Blank input keeps the
/// current value; `CLEAR_INPUT` empties a text field.
/// Input that sets a `Text`/`LongText` field to the empty string.
pub const CLEAR_INPUT: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordForm {
    record: Record,
}

impl RecordForm {
    /// Form for a new record.
    pub fn blank(today: NaiveDate) -> Self {
        let mut record = Record::new();
        for spec in &FIELDS {
            record.set(spec.key, spec.default_value(today));
        }
        Self { record }
    }

    /// Form prefilled from an existing record. Fields the record lacks, and
    /// choice values outside the option set, start from the defaults.
    pub fn edit(existing: &Record, today: NaiveDate) -> Self {
        let mut record = existing.clone();
        for spec in &FIELDS {
            let usable = record.get(spec.key).is_some_and(|v| spec.accepts(v));
            if !usable {
                record.set(spec.key, spec.default_value(today));
            }
        }
        Self { record }
    }

    /// Current value of `spec` as shown in the prompt.
    pub fn prefill(&self, spec: &FieldSpec) -> String {
        self.record
            .get(spec.key)
            .map(|v| spec.display_value(v))
            .unwrap_or_default()
    }

    /// Apply one line of user input to `spec`.
    pub fn apply(&mut self, spec: &FieldSpec, input: &str) -> Result<(), FieldError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        if trimmed == CLEAR_INPUT {
            return match spec.kind {
                FieldKind::Text | FieldKind::LongText => {
                    self.record.set(spec.key, "");
                    Ok(())
                }
                _ => Err(FieldError::NotClearable(spec.name)),
            };
        }
        let value = spec.parse_input(input)?;
        self.record.set(spec.key, value);
        Ok(())
    }

    /// Apply input addressed by wire key.
    pub fn apply_key(&mut self, key: &str, input: &str) -> Result<(), FieldError> {
        let spec = crate::fields::field_by_key(key)
            .ok_or_else(|| FieldError::UnknownField(key.to_string()))?;
        self.apply(spec, input)
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}
