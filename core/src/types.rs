//! Domain DTOs for the records API.
//!
//! # Design
//! `Record` keeps its fields as a JSON map rather than a struct with twenty
//! typed members: the remote API is the only schema authority, and unknown
//! keys must survive a fetch/update round-trip. The identifier is lifted out
//! of the map so it is never sent back in a request body.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::fields::{HOSPITAL_KEY, NAME_KEY};
use crate::normalize::value_text;

/// One patient's surgical record as exchanged with the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier assigned by the API; absent until the record is created.
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "id_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, handy for fixtures.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Display text of a field; missing fields read as empty.
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(value_text).unwrap_or_default()
    }

    /// Patient name, the key used by the update/delete pickers.
    pub fn name(&self) -> String {
        self.text(NAME_KEY)
    }

    pub fn hospital(&self) -> String {
        self.text(HOSPITAL_KEY)
    }
}

/// Accept any JSON id the API sends; `null` means no id.
fn id_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(value) => Some(value_text(&value)),
    })
}

/// Request payload for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Result of a login attempt. Rejection covers every non-200 outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    Rejected,
}
