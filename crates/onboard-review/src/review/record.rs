use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::attributes::{Attribute, SourceField};

const DECISION_KEY: &str = "decision";
const FALLBACK_KEY: &str = "isFallback";

/// One extracted document value. Keys are not schema-enforced, so every JSON
/// shape the extractor can emit has a home here.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Number(serde_json::Number),
    List(Vec<String>),
    /// Nested objects, mixed arrays, and explicit nulls.
    Other(Value),
}

impl FieldValue {
    /// Missing, blank, and the literal string `"null"` all mean "unknown".
    pub fn is_known(&self) -> bool {
        match self {
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                !trimmed.is_empty() && trimmed != "null"
            }
            FieldValue::Flag(_) | FieldValue::Number(_) => true,
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Other(value) => !value.is_null(),
        }
    }

    /// Display form of a scalar value; structured values have none.
    pub fn display_text(&self) -> Option<String> {
        if !self.is_known() {
            return None;
        }

        match self {
            FieldValue::Text(text) => Some(text.trim().to_string()),
            FieldValue::Flag(flag) => Some(if *flag { "Yes" } else { "No" }.to_string()),
            FieldValue::Number(number) => Some(number.to_string()),
            FieldValue::List(items) => Some(items.join(", ")),
            FieldValue::Other(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FieldValue::Other(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text),
            FieldValue::Flag(flag) => Value::Bool(flag),
            FieldValue::Number(number) => Value::Number(number),
            FieldValue::List(items) => Value::Array(items.into_iter().map(Value::String).collect()),
            FieldValue::Other(value) => value,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => FieldValue::Text(text),
            Value::Bool(flag) => FieldValue::Flag(flag),
            Value::Number(number) => FieldValue::Number(number),
            Value::Array(items) if items.iter().all(Value::is_string) => FieldValue::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text),
                        _ => None,
                    })
                    .collect(),
            ),
            other => FieldValue::Other(other),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Sparse client document, keyed `"<semantic_field>_<source_document>"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ClientRecord {
    fields: BTreeMap<String, FieldValue>,
    decision: Option<String>,
    is_fallback: bool,
}

impl ClientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when the payload is not a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from(map)),
            _ => None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_decision(mut self, decision: impl Into<String>) -> Self {
        self.set_decision(decision);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn decision(&self) -> Option<&str> {
        self.decision
            .as_deref()
            .map(str::trim)
            .filter(|decision| !decision.is_empty())
    }

    pub fn set_decision(&mut self, decision: impl Into<String>) {
        self.decision = Some(decision.into());
    }

    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }

    pub(crate) fn mark_fallback(&mut self) {
        self.is_fallback = true;
    }

    /// First known value among `keys`, in priority order.
    pub fn first_known(&self, keys: &[&str]) -> Option<&FieldValue> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key))
            .find(|value| value.is_known())
    }

    /// First candidate with a displayable value; structured values are
    /// passed over rather than hiding later candidates.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key))
            .find_map(FieldValue::display_text)
    }

    pub fn resolve(&self, attribute: Attribute) -> Option<String> {
        self.first_text(attribute.candidate_keys())
    }

    /// Value as reported by one specific source document.
    pub fn source_text(&self, field: SourceField) -> Option<String> {
        self.first_text(&[field.key()])
    }
}

impl From<Map<String, Value>> for ClientRecord {
    fn from(map: Map<String, Value>) -> Self {
        let mut record = ClientRecord::default();

        for (key, value) in map {
            match key.as_str() {
                DECISION_KEY => {
                    record.decision = match value {
                        Value::String(decision) => Some(decision),
                        Value::Null => None,
                        other => Some(other.to_string()),
                    };
                }
                FALLBACK_KEY => record.is_fallback = value.as_bool().unwrap_or(false),
                _ => {
                    record.fields.insert(key, FieldValue::from(value));
                }
            }
        }

        record
    }
}

impl From<ClientRecord> for Map<String, Value> {
    fn from(record: ClientRecord) -> Self {
        let mut map: Map<String, Value> = record
            .fields
            .into_iter()
            .map(|(key, value)| (key, value.into_value()))
            .collect();

        if let Some(decision) = record.decision {
            map.insert(DECISION_KEY.to_string(), Value::String(decision));
        }
        if record.is_fallback {
            map.insert(FALLBACK_KEY.to_string(), Value::Bool(true));
        }

        map
    }
}
