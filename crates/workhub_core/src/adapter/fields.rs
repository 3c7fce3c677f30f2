//! Field codecs shared by the entity mappings.
//!
//! Hosted record services are loose about value types (lookups come back as
//! `{Id, Name}` objects, booleans as `0/1`, lists as comma-separated text),
//! so readers accept every shape seen in practice and writers always emit
//! one canonical shape.

use super::MappingError;
use crate::model::RecordId;
use crate::record::Record;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Suffix carried by every persisted field, separating it from system
/// columns such as `Owner` or `CreatedOn`.
pub const FIELD_SUFFIX: &str = "_c";

/// UI name paired with its persisted name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub ui: &'static str,
    pub remote: &'static str,
}

/// Derives the persisted name for a camelCase UI field name.
pub fn remote_name(ui: &str) -> String {
    let mut name = String::with_capacity(ui.len() + FIELD_SUFFIX.len() + 4);
    for ch in ui.chars() {
        if ch.is_ascii_uppercase() {
            name.push('_');
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name.push_str(FIELD_SUFFIX);
    name
}

/// Fixed-width nanosecond RFC 3339, so text order matches instant order.
pub(crate) fn time_value(value: DateTime<Utc>) -> Value {
    Value::String(value.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

pub(crate) fn optional_time_value(value: Option<DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, time_value)
}

pub(crate) fn optional_id_value(value: Option<RecordId>) -> Value {
    value.map_or(Value::Null, Value::from)
}

pub(crate) fn id_list_value(ids: &[RecordId]) -> Value {
    Value::String(
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Typed reads over one record of one collection.
pub(crate) struct FieldReader<'a> {
    collection: &'static str,
    record: &'a Record,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(collection: &'static str, record: &'a Record) -> Self {
        Self { collection, record }
    }

    fn invalid(&self, field: &str, problem: impl Into<String>) -> MappingError {
        MappingError {
            collection: self.collection,
            id: self.record.id,
            field: field.to_string(),
            problem: problem.into(),
        }
    }

    fn value(&self, field: &str) -> Option<&'a Value> {
        match self.record.field(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// Missing or null text reads as empty.
    pub(crate) fn text(&self, field: &str) -> Result<String, MappingError> {
        match self.value(field) {
            None => Ok(String::new()),
            Some(Value::String(text)) => Ok(text.clone()),
            Some(Value::Number(number)) => Ok(number.to_string()),
            Some(other) => Err(self.invalid(field, format!("expected text, got {other}"))),
        }
    }

    pub(crate) fn required_text(&self, field: &str) -> Result<String, MappingError> {
        let text = self.text(field)?;
        if text.is_empty() {
            return Err(self.invalid(field, "is missing"));
        }
        Ok(text)
    }

    pub(crate) fn parsed<T>(
        &self,
        field: &str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, MappingError> {
        let text = self.required_text(field)?;
        parse(&text).ok_or_else(|| self.invalid(field, format!("has unknown value `{text}`")))
    }

    /// Like `parsed`, but a missing value falls back to `default`.
    pub(crate) fn parsed_or<T>(
        &self,
        field: &str,
        default: T,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, MappingError> {
        if self.value(field).is_none() {
            return Ok(default);
        }
        self.parsed(field, parse)
    }

    pub(crate) fn optional_time(&self, field: &str) -> Result<Option<DateTime<Utc>>, MappingError> {
        let text = self.text(field)?;
        if text.is_empty() {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(&text)
            .map(|value| Some(value.with_timezone(&Utc)))
            .map_err(|err| self.invalid(field, format!("is not an RFC 3339 timestamp: {err}")))
    }

    pub(crate) fn time(&self, field: &str) -> Result<DateTime<Utc>, MappingError> {
        self.optional_time(field)?
            .ok_or_else(|| self.invalid(field, "is missing"))
    }

    /// Lookup column: a bare id, a numeric string, or an `{Id, Name}` object.
    pub(crate) fn optional_id(&self, field: &str) -> Result<Option<RecordId>, MappingError> {
        let Some(value) = self.value(field) else {
            return Ok(None);
        };
        let id = match value {
            Value::Object(lookup) => lookup.get("Id").and_then(id_from_value),
            other => id_from_value(other),
        };
        id.map(Some)
            .ok_or_else(|| self.invalid(field, format!("is not a record reference: {value}")))
    }

    /// Comma-separated text or a JSON array of ids; order is preserved.
    pub(crate) fn id_list(&self, field: &str) -> Result<Vec<RecordId>, MappingError> {
        match self.value(field) {
            None => Ok(Vec::new()),
            Some(Value::String(text)) => text
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| {
                    part.parse::<RecordId>()
                        .map_err(|_| self.invalid(field, format!("holds non-numeric id `{part}`")))
                })
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    let id = match item {
                        Value::Object(lookup) => lookup.get("Id").and_then(id_from_value),
                        other => id_from_value(other),
                    };
                    id.ok_or_else(|| self.invalid(field, format!("holds non-id entry {item}")))
                })
                .collect(),
            Some(other) => Err(self.invalid(field, format!("expected id list, got {other}"))),
        }
    }

    /// Missing reads as `false`.
    pub(crate) fn flag(&self, field: &str) -> Result<bool, MappingError> {
        match self.value(field) {
            None => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(Value::Number(number)) => match number.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(self.invalid(field, format!("expected 0 or 1, got {number}"))),
            },
            Some(Value::String(text)) => match text.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(self.invalid(field, format!("expected boolean, got `{text}`"))),
            },
            Some(other) => Err(self.invalid(field, format!("expected boolean, got {other}"))),
        }
    }
}

fn id_from_value(value: &Value) -> Option<RecordId> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
