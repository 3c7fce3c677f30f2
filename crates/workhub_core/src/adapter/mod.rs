//! Record adapters: UI entities over the generic record service.
//!
//! # Responsibility
//! - Translate entities, drafts and patches to suffix-tagged record fields
//!   and back.
//! - Issue the CRUD and filter calls for one collection.
//! - Normalize every failure (transport, remote-reported, per-record,
//!   not-found) into one `AdapterError`.
//!
//! # Invariants
//! - Every failed operation emits exactly one error notification and one
//!   `error!` log line, regardless of how many records in a batch failed.
//! - Only fields present in a patch are sent on update.
//! - Nothing is retried.

pub mod announcement;
pub mod employee;
pub mod event;
mod fields;
pub mod task;

use crate::model::{RecordId, ValidationError};
use crate::notify::Notifier;
use crate::record::{
    CollectionSchema, Condition, FetchQuery, FieldMap, MutationResponse, OrderBy, Record,
    RecordClient, SortDirection, TransportError,
};
use chrono::{DateTime, Utc};
use log::{debug, error};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

pub use announcement::{AnnouncementAdapter, AnnouncementRecords};
pub use employee::{EmployeeAdapter, EmployeeRecords};
pub use event::{ScheduleEventAdapter, ScheduleEventRecords};
pub use fields::{remote_name, FieldSpec, FIELD_SUFFIX};
pub use task::{TaskAdapter, TaskRecords};

pub type AdapterResult<T> = Result<T, AdapterError>;

/// A record that cannot be read back as its entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {id} in `{collection}`: field `{field}` {problem}")]
pub struct MappingError {
    pub collection: &'static str,
    pub id: RecordId,
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The service answered `success: false`.
    #[error("{0}")]
    Remote(String),
    /// Some records of a mutation were refused; `ids` lists the refused
    /// identifiers when the request named them.
    #[error("{details}")]
    Rejected { ids: Vec<RecordId>, details: String },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: RecordId },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Two-way translation between one entity type and its collection.
pub trait RecordMapping: Send + Sync + 'static {
    type Entity: Clone + Debug + Send + Sync;
    type Draft: Debug;
    type Patch: Debug;

    const COLLECTION: &'static str;
    /// Lowercase singular used in messages.
    const NOUN: &'static str;
    const PLURAL: &'static str;
    const FIELDS: &'static [FieldSpec];
    const DEFAULT_ORDER: (&'static str, SortDirection);

    fn id(entity: &Self::Entity) -> RecordId;

    fn from_record(record: &Record) -> Result<Self::Entity, MappingError>;

    /// Every persisted field of an existing entity.
    fn to_fields(entity: &Self::Entity) -> FieldMap;

    /// Validates the draft and fills creation defaults.
    fn draft_fields(draft: &Self::Draft, now: DateTime<Utc>) -> Result<FieldMap, ValidationError>;

    /// Validates the patch and emits only the fields it sets.
    fn patch_fields(patch: &Self::Patch) -> Result<FieldMap, ValidationError>;

    fn remote_fields() -> Vec<String> {
        Self::FIELDS
            .iter()
            .map(|spec| spec.remote.to_string())
            .collect()
    }

    fn schema() -> CollectionSchema {
        let names: Vec<&str> = Self::FIELDS.iter().map(|spec| spec.remote).collect();
        CollectionSchema::new(Self::COLLECTION, &names)
    }
}

/// Schemas of every portal collection, for seeding a local record store.
pub fn portal_schemas() -> Vec<CollectionSchema> {
    vec![
        TaskRecords::schema(),
        EmployeeRecords::schema(),
        ScheduleEventRecords::schema(),
        AnnouncementRecords::schema(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Load,
    Get,
    Create,
    Update,
    Delete,
    MarkRead,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::MarkRead => "mark_read",
        }
    }

    fn failure_message<M: RecordMapping>(self) -> String {
        match self {
            Self::Load => format!("Failed to load {}", M::PLURAL),
            Self::Get => format!("Failed to load {}", M::NOUN),
            Self::Create => format!("Failed to create {}", M::NOUN),
            Self::Update => format!("Failed to update {}", M::NOUN),
            Self::Delete => format!("Failed to delete {}", M::NOUN),
            Self::MarkRead => "Failed to mark as read".to_string(),
        }
    }
}

/// CRUD and query access to one collection.
///
/// Constructed explicitly with its client and notifier; there is no shared
/// process-wide instance.
pub struct RecordAdapter<M: RecordMapping> {
    client: Arc<dyn RecordClient>,
    notifier: Arc<dyn Notifier>,
    mapping: PhantomData<fn() -> M>,
}

impl<M: RecordMapping> RecordAdapter<M> {
    pub fn new(client: Arc<dyn RecordClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            mapping: PhantomData,
        }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Every record of the collection in its default order.
    pub fn get_all(&self) -> AdapterResult<Vec<M::Entity>> {
        self.query(Operation::Load, Vec::new())
    }

    pub fn get_by_id(&self, id: RecordId) -> AdapterResult<M::Entity> {
        let outcome = self
            .client
            .get_record_by_id(M::COLLECTION, id, &M::remote_fields())
            .map_err(AdapterError::from)
            .and_then(|response| {
                if !response.success {
                    return Err(remote_failure(response.message));
                }
                let record = response.data.ok_or(AdapterError::NotFound {
                    entity: M::NOUN,
                    id,
                })?;
                Ok(M::from_record(&record)?)
            });
        self.finish(Operation::Get, outcome)
    }

    pub fn create(&self, draft: &M::Draft) -> AdapterResult<M::Entity> {
        let outcome = M::draft_fields(draft, Utc::now())
            .map_err(AdapterError::from)
            .and_then(|fields| {
                self.client
                    .create_records(M::COLLECTION, vec![fields])
                    .map_err(AdapterError::from)
            })
            .and_then(|response| self.single_result(response, None));
        self.finish(Operation::Create, outcome)
    }

    pub fn update(&self, id: RecordId, patch: &M::Patch) -> AdapterResult<M::Entity> {
        match M::patch_fields(patch) {
            Ok(fields) => self.update_fields(Operation::Update, id, fields),
            Err(err) => self.finish(Operation::Update, Err(err.into())),
        }
    }

    pub(crate) fn update_fields(
        &self,
        operation: Operation,
        id: RecordId,
        fields: FieldMap,
    ) -> AdapterResult<M::Entity> {
        let outcome = self
            .client
            .update_records(M::COLLECTION, vec![Record::new(id, fields)])
            .map_err(AdapterError::from)
            .and_then(|response| self.single_result(response, Some(id)));
        self.finish(operation, outcome)
    }

    /// Deletes every id in one batched request. Succeeds only when every id
    /// was deleted; ids that were deleted stay deleted either way.
    pub fn delete(&self, ids: &[RecordId]) -> AdapterResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let outcome = self
            .client
            .delete_records(M::COLLECTION, ids)
            .map_err(AdapterError::from)
            .and_then(|response| {
                if !response.success {
                    return Err(remote_failure(response.message));
                }
                if response.results.len() != ids.len() {
                    return Err(AdapterError::Malformed(format!(
                        "expected {} delete results, got {}",
                        ids.len(),
                        response.results.len()
                    )));
                }
                let failed: Vec<_> = ids
                    .iter()
                    .zip(&response.results)
                    .filter(|(_, result)| !result.success)
                    .collect();
                if failed.is_empty() {
                    return Ok(());
                }
                Err(AdapterError::Rejected {
                    ids: failed.iter().map(|(id, _)| **id).collect(),
                    details: failed
                        .iter()
                        .map(|(id, result)| format!("{id}: {}", result.failure_summary()))
                        .collect::<Vec<_>>()
                        .join("; "),
                })
            });
        self.finish(Operation::Delete, outcome)
    }

    pub fn delete_one(&self, id: RecordId) -> AdapterResult<()> {
        self.delete(&[id])
    }

    /// Default-ordered fetch restricted by `conditions`.
    pub(crate) fn query(
        &self,
        operation: Operation,
        conditions: Vec<Condition>,
    ) -> AdapterResult<Vec<M::Entity>> {
        let (order_field, direction) = M::DEFAULT_ORDER;
        let query = FetchQuery {
            fields: M::remote_fields(),
            conditions,
            order_by: vec![OrderBy {
                field: order_field.to_string(),
                direction,
            }],
        };
        let outcome: AdapterResult<Vec<M::Entity>> = self
            .client
            .fetch_records(M::COLLECTION, &query)
            .map_err(AdapterError::from)
            .and_then(|response| {
                if !response.success {
                    return Err(remote_failure(response.message));
                }
                response
                    .data
                    .iter()
                    .map(|record| M::from_record(record).map_err(AdapterError::from))
                    .collect()
            });
        self.finish(operation, outcome)
    }

    fn single_result(
        &self,
        response: MutationResponse,
        id: Option<RecordId>,
    ) -> AdapterResult<M::Entity> {
        if !response.success {
            return Err(remote_failure(response.message));
        }
        let result = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| AdapterError::Malformed("mutation returned no results".to_string()))?;
        if !result.success {
            return Err(AdapterError::Rejected {
                ids: id.into_iter().collect(),
                details: result.failure_summary(),
            });
        }
        let record = result
            .data
            .ok_or_else(|| AdapterError::Malformed("mutation result carries no record".to_string()))?;
        Ok(M::from_record(&record)?)
    }

    fn finish<T>(&self, operation: Operation, outcome: AdapterResult<T>) -> AdapterResult<T> {
        match &outcome {
            Ok(_) => debug!(
                "event=adapter_op module=adapter status=ok collection={} op={}",
                M::COLLECTION,
                operation.name()
            ),
            Err(err) => {
                error!(
                    "event=adapter_op module=adapter status=error collection={} op={} error={}",
                    M::COLLECTION,
                    operation.name(),
                    err
                );
                self.notifier.error(&format!(
                    "{}: {err}",
                    operation.failure_message::<M>()
                ));
            }
        }
        outcome
    }
}

fn remote_failure(message: Option<String>) -> AdapterError {
    AdapterError::Remote(message.unwrap_or_else(|| "record service reported failure".to_string()))
}

#[cfg(test)]
mod tests {
    use super::{portal_schemas, remote_name, RecordMapping};
    use super::{AnnouncementRecords, EmployeeRecords, ScheduleEventRecords, TaskRecords};

    fn assert_convention<M: RecordMapping>() {
        for spec in M::FIELDS {
            assert_eq!(spec.remote, remote_name(spec.ui), "{}", M::COLLECTION);
            assert_ne!(spec.remote, spec.ui);
        }
        assert!(M::FIELDS
            .iter()
            .any(|spec| spec.remote == M::DEFAULT_ORDER.0));
    }

    #[test]
    fn every_mapping_follows_the_suffix_convention() {
        assert_convention::<TaskRecords>();
        assert_convention::<EmployeeRecords>();
        assert_convention::<ScheduleEventRecords>();
        assert_convention::<AnnouncementRecords>();
    }

    #[test]
    fn portal_schemas_cover_four_collections() {
        let names: Vec<_> = portal_schemas().into_iter().map(|schema| schema.name).collect();
        assert_eq!(
            names,
            vec!["task_c", "employee_c", "schedule_event_c", "announcement_c"]
        );
    }
}
