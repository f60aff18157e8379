//! Raw post mapping as produced by ingestion.
//!
//! A `RawRecord` is a JSON object. Any field may be missing, and a present
//! field may carry the wrong type. Accessors report the latter as a
//! `RecordError` so callers can skip the record without aborting a batch.

use super::canonical::Engagement;
use super::fields;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while reading a field from a raw record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Field is present but not of the expected JSON type.
    #[error("field `{field}` has the wrong type: expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    /// Timestamp field could not be interpreted as an instant.
    #[error("field `{field}` is not a valid timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
}

/// A single post as captured by ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a field.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    /// Returns the raw value of a field, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns true if the field is present and not null.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_null())
    }

    /// Author handle.
    ///
    /// # Errors
    /// Returns an error if the field is present but not a string.
    pub fn username(&self) -> Result<Option<&str>, RecordError> {
        self.optional_str(fields::USERNAME)
    }

    /// Post text.
    ///
    /// # Errors
    /// Returns an error if the field is present but not a string.
    pub fn content(&self) -> Result<Option<&str>, RecordError> {
        self.optional_str(fields::CONTENT)
    }

    /// Publication instant.
    ///
    /// Accepts RFC 3339 strings and integer epoch milliseconds.
    ///
    /// # Errors
    /// Returns an error if the field is present but cannot be read as an instant.
    pub fn timestamp(&self) -> Result<Option<DateTime<Utc>>, RecordError> {
        let field = fields::TIMESTAMP;
        match self.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|_| RecordError::InvalidTimestamp {
                    field,
                    value: s.clone(),
                }),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
                .map(Some)
                .ok_or_else(|| RecordError::InvalidTimestamp {
                    field,
                    value: n.to_string(),
                }),
            Some(_) => Err(RecordError::WrongType {
                field,
                expected: "RFC 3339 string or epoch milliseconds",
            }),
        }
    }

    /// Engagement counters keyed by metric name.
    ///
    /// # Errors
    /// Returns an error if the field is not an object of non-negative integers.
    pub fn engagement(&self) -> Result<Option<Engagement>, RecordError> {
        let field = fields::ENGAGEMENT;
        let wrong_type = RecordError::WrongType {
            field,
            expected: "object of non-negative integers",
        };

        match self.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(name, count)| {
                    count
                        .as_u64()
                        .map(|c| (name.clone(), c))
                        .ok_or_else(|| wrong_type.clone())
                })
                .collect::<Result<Engagement, _>>()
                .map(Some),
            Some(_) => Err(wrong_type),
        }
    }

    /// Mentioned handles.
    ///
    /// # Errors
    /// Returns an error if the field is not an array of strings.
    pub fn mentions(&self) -> Result<Option<Vec<String>>, RecordError> {
        self.optional_string_list(fields::MENTIONS)
    }

    /// Hashtags attached to the post.
    ///
    /// # Errors
    /// Returns an error if the field is not an array of strings.
    pub fn hashtags(&self) -> Result<Option<Vec<String>>, RecordError> {
        self.optional_string_list(fields::HASHTAGS)
    }

    fn optional_str(&self, field: &'static str) -> Result<Option<&str>, RecordError> {
        match self.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(RecordError::WrongType {
                field,
                expected: "string",
            }),
        }
    }

    fn optional_string_list(
        &self,
        field: &'static str,
    ) -> Result<Option<Vec<String>>, RecordError> {
        let wrong_type = RecordError::WrongType {
            field,
            expected: "array of strings",
        };

        match self.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| wrong_type.clone())
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(wrong_type),
        }
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for RawRecord {
    type Error = Value;

    /// Accepts JSON objects; hands back any other value unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
