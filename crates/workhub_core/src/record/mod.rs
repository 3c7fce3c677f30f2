//! Record-collection protocol shared by every backend.
//!
//! # Responsibility
//! - Define the request/response shapes of the generic record service.
//! - Define the `RecordClient` seam adapters talk through.
//!
//! # Invariants
//! - Every response carries an explicit `success` flag; batched mutations
//!   also carry one `RecordResult` per requested record, in request order.
//! - Clients never retry; one call is one attempt.

pub mod http;
pub mod local;

use crate::model::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use http::HttpRecordClient;
pub use local::{CollectionSchema, LocalRecordStore};

/// Field name -> value map of one record, system columns excluded.
pub type FieldMap = Map<String, Value>;

pub type TransportResult<T> = Result<T, TransportError>;

/// Failure to reach the record service or to read its answer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("record service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("local store failure: {0}")]
    Store(String),
}

impl From<rusqlite::Error> for TransportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(value.to_string())
    }
}

impl From<crate::db::DbError> for TransportError {
    fn from(value: crate::db::DbError) -> Self {
        Self::Store(value.to_string())
    }
}

/// One stored record: identifier plus its persisted fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl Record {
    pub fn new(id: RecordId, fields: FieldMap) -> Self {
        Self { id, fields }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    EqualTo,
    NotEqualTo,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
}

/// Predicate pushed down to the record service. All conditions of a query
/// must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "FieldName")]
    pub field: String,
    #[serde(rename = "Operator")]
    pub operator: Operator,
    #[serde(rename = "Values")]
    pub values: Vec<Value>,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            values: vec![value.into()],
        }
    }

    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::EqualTo, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field: String,
    #[serde(rename = "sorttype")]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchQuery {
    /// Empty means every field.
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(rename = "where", default)]
    pub conditions: Vec<Condition>,
    #[serde(rename = "orderBy", default)]
    pub order_by: Vec<OrderBy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Record>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field_label: String,
    pub message: String,
}

/// Outcome for one record of a batched mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Record>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

impl RecordResult {
    pub fn ok(data: Option<Record>) -> Self {
        Self {
            success: true,
            data,
            message: None,
            errors: Vec::new(),
        }
    }

    pub fn failed(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors,
        }
    }

    /// One-line summary of why this record failed.
    pub fn failure_summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(message) = self.message.as_deref() {
            parts.push(message.to_string());
        }
        for error in &self.errors {
            parts.push(format!("{}: {}", error.field_label, error.message));
        }
        if parts.is_empty() {
            "record rejected".to_string()
        } else {
            parts.join("; ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Vec<RecordResult>,
}

/// Generic keyed-record service addressed by collection name.
pub trait RecordClient: Send + Sync {
    fn fetch_records(&self, collection: &str, query: &FetchQuery)
        -> TransportResult<FetchResponse>;

    fn get_record_by_id(
        &self,
        collection: &str,
        id: RecordId,
        fields: &[String],
    ) -> TransportResult<RecordResponse>;

    fn create_records(
        &self,
        collection: &str,
        records: Vec<FieldMap>,
    ) -> TransportResult<MutationResponse>;

    /// Each record carries only the fields to change.
    fn update_records(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> TransportResult<MutationResponse>;

    fn delete_records(
        &self,
        collection: &str,
        ids: &[RecordId],
    ) -> TransportResult<MutationResponse>;
}
