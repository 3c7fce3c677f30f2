//! SQLite-backed record service running inside the process.
//!
//! # Responsibility
//! - Serve the record protocol without a network service, for tests,
//!   demos and offline development.
//! - Assign identifiers and stamp system columns like a hosted service.
//!
//! # Invariants
//! - Identifiers come from `AUTOINCREMENT` and are never reused, even after
//!   deletion.
//! - Fields outside the collection schema are rejected per record; the rest
//!   of a batch still applies.
//! - Each call runs under one connection lock, so calls never interleave.

use super::{
    Condition, FetchQuery, FetchResponse, FieldError, FieldMap, MutationResponse, Operator,
    Record, RecordClient, RecordResponse, RecordResult, SortDirection, TransportResult,
};
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::RecordId;
use chrono::{SecondsFormat, Utc};
use log::debug;
use parking_lot::Mutex;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_OWNER: &str = "workhub-local";
const ID_FIELD: &str = "Id";

/// Persisted field names accepted by one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: Vec<String>,
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|field| field.to_string()).collect(),
        }
    }

    fn knows(&self, field: &str) -> bool {
        self.fields.iter().any(|known| known == field)
    }

    fn unknown_fields(&self, fields: &FieldMap) -> Vec<FieldError> {
        fields
            .keys()
            .filter(|field| !self.knows(field))
            .map(|field| FieldError {
                field_label: field.clone(),
                message: "field is not part of the collection schema".to_string(),
            })
            .collect()
    }
}

pub struct LocalRecordStore {
    conn: Mutex<Connection>,
    schemas: BTreeMap<String, CollectionSchema>,
}

impl LocalRecordStore {
    pub fn open(
        path: impl AsRef<Path>,
        schemas: impl IntoIterator<Item = CollectionSchema>,
    ) -> DbResult<Self> {
        Ok(Self::with_connection(open_db(path)?, schemas))
    }

    pub fn open_in_memory(schemas: impl IntoIterator<Item = CollectionSchema>) -> DbResult<Self> {
        Ok(Self::with_connection(open_db_in_memory()?, schemas))
    }

    fn with_connection(
        conn: Connection,
        schemas: impl IntoIterator<Item = CollectionSchema>,
    ) -> Self {
        Self {
            conn: Mutex::new(conn),
            schemas: schemas
                .into_iter()
                .map(|schema| (schema.name.clone(), schema))
                .collect(),
        }
    }

    fn schema(&self, collection: &str) -> Option<&CollectionSchema> {
        self.schemas.get(collection)
    }

    fn load(
        conn: &Connection,
        collection: &str,
        id: RecordId,
    ) -> TransportResult<Option<StoredRow>> {
        let row = conn
            .query_row(
                "SELECT id, fields, owner, created_on, modified_on
                 FROM records
                 WHERE collection = ?1 AND id = ?2;",
                params![collection, id],
                StoredRow::from_sql,
            )
            .optional()?;
        Ok(row)
    }
}

struct StoredRow {
    id: RecordId,
    fields: String,
    owner: String,
    created_on: String,
    modified_on: String,
}

impl StoredRow {
    fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            fields: row.get(1)?,
            owner: row.get(2)?,
            created_on: row.get(3)?,
            modified_on: row.get(4)?,
        })
    }

    fn field_map(&self) -> TransportResult<FieldMap> {
        serde_json::from_str(&self.fields).map_err(|err| {
            super::TransportError::Store(format!(
                "record {} holds invalid field json: {err}",
                self.id
            ))
        })
    }

    /// Projects the stored row; an empty selection returns every field plus
    /// the system columns.
    fn into_record(self, selection: &[String]) -> TransportResult<Record> {
        let stored = self.field_map()?;
        let fields = if selection.is_empty() {
            let mut fields = stored;
            fields.insert("Owner".to_string(), Value::String(self.owner));
            fields.insert("CreatedOn".to_string(), Value::String(self.created_on));
            fields.insert("ModifiedOn".to_string(), Value::String(self.modified_on));
            fields
        } else {
            selection
                .iter()
                .filter_map(|name| stored.get(name).map(|value| (name.clone(), value.clone())))
                .collect()
        };
        Ok(Record::new(self.id, fields))
    }
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(flag) => SqlValue::Integer(i64::from(*flag)),
        Value::Number(number) => match number.as_i64() {
            Some(int) => SqlValue::Integer(int),
            None => SqlValue::Real(number.as_f64().unwrap_or_default()),
        },
        Value::String(text) => SqlValue::Text(text.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// Appends one condition to `sql`; returns a message for conditions the
/// store cannot evaluate.
fn push_condition(
    sql: &mut String,
    binds: &mut Vec<SqlValue>,
    condition: &Condition,
) -> Result<(), String> {
    let expr = if condition.field == ID_FIELD {
        "id"
    } else {
        binds.push(SqlValue::Text(format!("$.{}", condition.field)));
        "json_extract(fields, ?)"
    };

    match (condition.operator, condition.values.as_slice()) {
        (_, []) => Err(format!("condition on `{}` has no values", condition.field)),
        (Operator::EqualTo, [Value::Null]) => {
            sql.push_str(&format!(" AND {expr} IS NULL"));
            Ok(())
        }
        (Operator::NotEqualTo, [Value::Null]) => {
            sql.push_str(&format!(" AND {expr} IS NOT NULL"));
            Ok(())
        }
        (Operator::EqualTo | Operator::NotEqualTo, values) => {
            let keyword = if condition.operator == Operator::EqualTo {
                "IN"
            } else {
                "NOT IN"
            };
            let placeholders = vec!["?"; values.len()].join(", ");
            sql.push_str(&format!(" AND {expr} {keyword} ({placeholders})"));
            binds.extend(values.iter().map(to_sql_value));
            Ok(())
        }
        (Operator::GreaterThanOrEqualTo | Operator::LessThanOrEqualTo, [value, ..]) => {
            if value.is_null() {
                return Err(format!("range condition on `{}` is null", condition.field));
            }
            let symbol = if condition.operator == Operator::GreaterThanOrEqualTo {
                ">="
            } else {
                "<="
            };
            sql.push_str(&format!(" AND {expr} {symbol} ?"));
            binds.push(to_sql_value(value));
            Ok(())
        }
    }
}

impl RecordClient for LocalRecordStore {
    fn fetch_records(
        &self,
        collection: &str,
        query: &FetchQuery,
    ) -> TransportResult<FetchResponse> {
        let failure = |message: String| FetchResponse {
            success: false,
            message: Some(message),
            data: Vec::new(),
        };

        let Some(schema) = self.schema(collection) else {
            return Ok(failure(format!("unknown collection `{collection}`")));
        };
        let referenced = query
            .fields
            .iter()
            .chain(query.conditions.iter().map(|condition| &condition.field))
            .chain(query.order_by.iter().map(|order| &order.field));
        for field in referenced {
            if field != ID_FIELD && !schema.knows(field) {
                return Ok(failure(format!(
                    "unknown field `{field}` in collection `{collection}`"
                )));
            }
        }

        let mut sql = String::from(
            "SELECT id, fields, owner, created_on, modified_on FROM records WHERE collection = ?",
        );
        let mut binds = vec![SqlValue::Text(collection.to_string())];
        for condition in &query.conditions {
            if let Err(message) = push_condition(&mut sql, &mut binds, condition) {
                return Ok(failure(message));
            }
        }

        let mut order_terms = Vec::new();
        for order in &query.order_by {
            let direction = match order.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            if order.field == ID_FIELD {
                order_terms.push(format!("id {direction}"));
            } else {
                order_terms.push(format!("json_extract(fields, ?) {direction}"));
                binds.push(SqlValue::Text(format!("$.{}", order.field)));
            }
        }
        order_terms.push("id ASC".to_string());
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_terms.join(", "));

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(binds), StoredRow::from_sql)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let data = rows
            .into_iter()
            .map(|row| row.into_record(&query.fields))
            .collect::<TransportResult<Vec<_>>>()?;

        debug!(
            "event=local_fetch module=record status=ok collection={} rows={}",
            collection,
            data.len()
        );
        Ok(FetchResponse {
            success: true,
            message: None,
            data,
        })
    }

    fn get_record_by_id(
        &self,
        collection: &str,
        id: RecordId,
        fields: &[String],
    ) -> TransportResult<RecordResponse> {
        if self.schema(collection).is_none() {
            return Ok(RecordResponse {
                success: false,
                message: Some(format!("unknown collection `{collection}`")),
                data: None,
            });
        }

        let conn = self.conn.lock();
        let data = match Self::load(&conn, collection, id)? {
            Some(row) => Some(row.into_record(fields)?),
            None => None,
        };
        Ok(RecordResponse {
            success: true,
            message: None,
            data,
        })
    }

    fn create_records(
        &self,
        collection: &str,
        records: Vec<FieldMap>,
    ) -> TransportResult<MutationResponse> {
        let Some(schema) = self.schema(collection) else {
            return Ok(unknown_collection(collection));
        };

        let conn = self.conn.lock();
        let mut results = Vec::with_capacity(records.len());
        for fields in records {
            let errors = schema.unknown_fields(&fields);
            if !errors.is_empty() {
                results.push(RecordResult::failed("record rejected", errors));
                continue;
            }

            let stamp = now_stamp();
            conn.execute(
                "INSERT INTO records (collection, fields, owner, created_on, modified_on)
                 VALUES (?1, ?2, ?3, ?4, ?4);",
                params![
                    collection,
                    Value::Object(fields).to_string(),
                    DEFAULT_OWNER,
                    stamp
                ],
            )?;
            let id = conn.last_insert_rowid();
            let created = Self::load(&conn, collection, id)?
                .map(|row| row.into_record(&[]))
                .transpose()?;
            results.push(RecordResult::ok(created));
        }

        Ok(MutationResponse {
            success: true,
            message: None,
            results,
        })
    }

    fn update_records(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> TransportResult<MutationResponse> {
        let Some(schema) = self.schema(collection) else {
            return Ok(unknown_collection(collection));
        };

        let conn = self.conn.lock();
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            let errors = schema.unknown_fields(&record.fields);
            if !errors.is_empty() {
                results.push(RecordResult::failed("record rejected", errors));
                continue;
            }
            let Some(existing) = Self::load(&conn, collection, record.id)? else {
                results.push(RecordResult::failed(
                    format!("record {} not found", record.id),
                    Vec::new(),
                ));
                continue;
            };

            let mut merged = existing.field_map()?;
            merged.extend(record.fields);
            conn.execute(
                "UPDATE records SET fields = ?1, modified_on = ?2
                 WHERE collection = ?3 AND id = ?4;",
                params![
                    Value::Object(merged).to_string(),
                    now_stamp(),
                    collection,
                    record.id
                ],
            )?;
            let updated = Self::load(&conn, collection, record.id)?
                .map(|row| row.into_record(&[]))
                .transpose()?;
            results.push(RecordResult::ok(updated));
        }

        Ok(MutationResponse {
            success: true,
            message: None,
            results,
        })
    }

    fn delete_records(
        &self,
        collection: &str,
        ids: &[RecordId],
    ) -> TransportResult<MutationResponse> {
        if self.schema(collection).is_none() {
            return Ok(unknown_collection(collection));
        }

        let conn = self.conn.lock();
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let changed = conn.execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2;",
                params![collection, id],
            )?;
            if changed == 0 {
                results.push(RecordResult::failed(
                    format!("record {id} not found"),
                    Vec::new(),
                ));
            } else {
                results.push(RecordResult::ok(None));
            }
        }

        Ok(MutationResponse {
            success: true,
            message: None,
            results,
        })
    }
}

fn unknown_collection(collection: &str) -> MutationResponse {
    MutationResponse {
        success: false,
        message: Some(format!("unknown collection `{collection}`")),
        results: Vec::new(),
    }
}
