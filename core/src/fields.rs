//! Static descriptor table for the surgical record schema.
//!
//! # Design
//! The create form, the update form, tabular display and PDF export all walk
//! `FIELDS` in order, so the column order and the set of fields are declared
//! exactly once. Wire keys are owned by the remote API; display names are the
//! labels printed in tables and reports.

use chrono::NaiveDate;
use serde_json::{Number, Value};
use thiserror::Error;

use crate::normalize::value_text;

/// Date format used on the wire and in prompts.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One option of a `FieldKind::Choice` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    /// Value stored by the API.
    pub value: &'static str,
    /// Value shown to the user.
    pub label: &'static str,
}

/// Input and storage shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `YYYY-MM-DD` string, defaults to today.
    Date,
    /// Single-line text.
    Text,
    /// Multi-line clinical notes, entered on one line.
    LongText,
    /// Whole number, stored as a JSON integer.
    Integer,
    /// Decimal number, stored as a JSON float.
    Decimal,
    /// One of a fixed set of options; the first option is the default.
    Choice(&'static [ChoiceOption]),
}

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key used by the API.
    pub key: &'static str,
    /// Column name in tables and `NAME: value` report lines.
    pub name: &'static str,
    /// Prompt shown in the create/update forms.
    pub label: &'static str,
    pub kind: FieldKind,
    /// Initial text for `Text`/`LongText` fields on a blank form.
    pub default: &'static str,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("{field}: '{input}' is not a date (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, input: String },

    #[error("{field}: '{input}' is not a whole number")]
    InvalidInteger { field: &'static str, input: String },

    #[error("{field}: '{input}' is not a number")]
    InvalidDecimal { field: &'static str, input: String },

    #[error("{field}: '{input}' is not one of {expected}")]
    InvalidChoice {
        field: &'static str,
        input: String,
        expected: String,
    },

    #[error("{0} is required and cannot be cleared")]
    NotClearable(&'static str),

    #[error("unknown field '{0}'")]
    UnknownField(String),
}

pub const TRANSFUSION_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption {
        value: "Sim",
        label: "Yes",
    },
    ChoiceOption {
        value: "Não",
        label: "No",
    },
];

const LAB_TEMPLATE: &str = "Ht%: , Hb: , Plaquetas: , Glicose: , ABO(Rh): , INR: , K+: , Na+: , E.A.S: , Ureia: , Creatina: , Imunologia: , ECO: FE(%): ";
const TEAM_TEMPLATE: &str = "Cirurgião: , Primeiro Auxiliar: , Segundo Auxiliar: , Anestesista: , Perfusionista: , Instrumentador: , Circulante: ";
const BYPASS_TEMPLATE: &str = "Tempo de CEC: , Tempo de Clamp: , PCT/APC: ";

pub const NAME_KEY: &str = "NOME";
pub const HOSPITAL_KEY: &str = "HOSPITAL";

const fn field(
    key: &'static str,
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
    default: &'static str,
) -> FieldSpec {
    FieldSpec {
        key,
        name,
        label,
        kind,
        default,
    }
}

/// Every record field, in display and export order.
pub const FIELDS: [FieldSpec; 20] = [
    field("DATA", "DATE", "Date", FieldKind::Date, ""),
    field(HOSPITAL_KEY, "HOSPITAL", "Hospital", FieldKind::Text, ""),
    field("CONV", "INSURER", "Insurer", FieldKind::Text, ""),
    field(NAME_KEY, "NAME", "Patient name", FieldKind::Text, ""),
    field("REG_HOSP", "HOSPITAL_REGISTRY", "Hospital registry", FieldKind::Text, ""),
    field("CART_INSC", "POLICY_NUMBER", "Policy number", FieldKind::Text, ""),
    field("ACOMODACAO", "ACCOMMODATION", "Accommodation", FieldKind::Text, ""),
    field("DATA_DE_NASC", "BIRTH_DATE", "Birth date", FieldKind::Date, ""),
    field("IDADE_EM_ANOS", "AGE_YEARS", "Age in years", FieldKind::Integer, ""),
    field("ALTURA_EM_METROS", "HEIGHT_M", "Height in meters", FieldKind::Decimal, ""),
    field("PESO_EM_Kg", "WEIGHT_KG", "Weight in kg", FieldKind::Decimal, ""),
    field(
        "DOENCAS_PRE_EXISTENTES",
        "PRE_EXISTING_CONDITIONS",
        "Pre-existing conditions",
        FieldKind::LongText,
        "",
    ),
    field(
        "ALERGIAS_INTOLERANCIAS",
        "ALLERGIES",
        "Allergies/intolerances",
        FieldKind::LongText,
        "",
    ),
    field(
        "CONDICOES_CLINICAS_LABORATORIAIS_PRE_OPERATORIA",
        "PRE_OP_LAB_CONDITIONS",
        "Pre-op clinical/lab conditions",
        FieldKind::LongText,
        LAB_TEMPLATE,
    ),
    field(
        "DIAGNOSTICO_PRE_OPERAT",
        "PRE_OP_DIAGNOSIS",
        "Pre-op diagnosis",
        FieldKind::Text,
        "",
    ),
    field(
        "CIRURGIAS_REALIZADAS",
        "SURGERIES_PERFORMED",
        "Surgeries performed",
        FieldKind::LongText,
        "",
    ),
    field("EQUIPE", "TEAM", "Team", FieldKind::LongText, TEAM_TEMPLATE),
    field(
        "PACIENTE_RECEBEU_HEMOTRANSFUSAO_EM_SALA",
        "RECEIVED_TRANSFUSION",
        "Received transfusion in the OR? (Yes/No)",
        FieldKind::Choice(TRANSFUSION_OPTIONS),
        "",
    ),
    field(
        "QUAIS",
        "TRANSFUSION_DETAILS",
        "Transfusion details",
        FieldKind::LongText,
        "",
    ),
    field("DADOS_CEC", "BYPASS_DATA", "Bypass data", FieldKind::LongText, BYPASS_TEMPLATE),
];

/// Look up a field by its wire key.
pub fn field_by_key(key: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.key == key)
}

impl FieldSpec {
    /// Value placed in a blank form.
    pub fn default_value(&self, today: NaiveDate) -> Value {
        match self.kind {
            FieldKind::Date => Value::String(today.format(DATE_FORMAT).to_string()),
            FieldKind::Integer => Value::from(0),
            FieldKind::Decimal => Value::from(0.0),
            FieldKind::Choice(options) => Value::String(options[0].value.to_string()),
            FieldKind::Text | FieldKind::LongText => Value::String(self.default.to_string()),
        }
    }

    /// Whether `value` is acceptable as stored data for this field.
    ///
    /// Only choices are checked; everything else is the API's business.
    pub fn accepts(&self, value: &Value) -> bool {
        match self.kind {
            FieldKind::Choice(options) => value
                .as_str()
                .is_some_and(|v| options.iter().any(|o| o.value == v)),
            _ => true,
        }
    }

    /// Parse user input into the JSON value stored for this field.
    pub fn parse_input(&self, input: &str) -> Result<Value, FieldError> {
        let trimmed = input.trim();
        match self.kind {
            FieldKind::Text | FieldKind::LongText => Ok(Value::String(input.to_string())),
            FieldKind::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(|d| Value::String(d.format(DATE_FORMAT).to_string()))
                .map_err(|_| FieldError::InvalidDate {
                    field: self.name,
                    input: input.to_string(),
                }),
            FieldKind::Integer => trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| FieldError::InvalidInteger {
                    field: self.name,
                    input: input.to_string(),
                }),
            FieldKind::Decimal => trimmed
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| FieldError::InvalidDecimal {
                    field: self.name,
                    input: input.to_string(),
                }),
            FieldKind::Choice(options) => options
                .iter()
                .find(|o| o.label.eq_ignore_ascii_case(trimmed) || o.value == trimmed)
                .map(|o| Value::String(o.value.to_string()))
                .ok_or_else(|| FieldError::InvalidChoice {
                    field: self.name,
                    input: input.to_string(),
                    expected: options
                        .iter()
                        .map(|o| o.label)
                        .collect::<Vec<_>>()
                        .join("/"),
                }),
        }
    }

    /// Text shown to the user for an already normalized value.
    ///
    /// Choice values are translated to their labels; unknown values pass
    /// through unchanged.
    pub fn display_text<'a>(&self, text: &'a str) -> &'a str {
        match self.kind {
            FieldKind::Choice(options) => options
                .iter()
                .find(|o| o.value == text)
                .map(|o| o.label)
                .unwrap_or(text),
            _ => text,
        }
    }

    /// Text shown to the user for a stored value.
    pub fn display_value(&self, value: &Value) -> String {
        self.display_text(&value_text(value)).to_string()
    }
}
