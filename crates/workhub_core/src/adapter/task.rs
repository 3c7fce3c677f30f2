//! Task collection mapping and task-specific queries.

use super::fields::{optional_id_value, optional_time_value, FieldReader, FieldSpec};
use super::{AdapterResult, MappingError, Operation, RecordAdapter, RecordMapping};
use crate::model::task::{NewTask, Priority, Task, TaskPatch, TaskStatus};
use crate::model::{RecordId, ValidationError};
use crate::record::{Condition, FieldMap, Record, SortDirection};
use chrono::{DateTime, Utc};
use serde_json::Value;

const TITLE: &str = "title_c";
const DESCRIPTION: &str = "description_c";
const PRIORITY: &str = "priority_c";
const STATUS: &str = "status_c";
const DUE_DATE: &str = "due_date_c";
const ASSIGNEE_ID: &str = "assignee_id_c";

pub struct TaskRecords;

pub type TaskAdapter = RecordAdapter<TaskRecords>;

impl RecordMapping for TaskRecords {
    type Entity = Task;
    type Draft = NewTask;
    type Patch = TaskPatch;

    const COLLECTION: &'static str = "task_c";
    const NOUN: &'static str = "task";
    const PLURAL: &'static str = "tasks";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec { ui: "title", remote: TITLE },
        FieldSpec { ui: "description", remote: DESCRIPTION },
        FieldSpec { ui: "priority", remote: PRIORITY },
        FieldSpec { ui: "status", remote: STATUS },
        FieldSpec { ui: "dueDate", remote: DUE_DATE },
        FieldSpec { ui: "assigneeId", remote: ASSIGNEE_ID },
    ];
    const DEFAULT_ORDER: (&'static str, SortDirection) = (DUE_DATE, SortDirection::Asc);

    fn id(entity: &Task) -> RecordId {
        entity.id
    }

    fn from_record(record: &Record) -> Result<Task, MappingError> {
        let fields = FieldReader::new(Self::COLLECTION, record);
        Ok(Task {
            id: record.id,
            title: fields.required_text(TITLE)?,
            description: fields.text(DESCRIPTION)?,
            priority: fields.parsed_or(PRIORITY, Priority::Medium, Priority::parse)?,
            status: fields.parsed_or(STATUS, TaskStatus::Todo, TaskStatus::parse)?,
            due_date: fields.optional_time(DUE_DATE)?,
            assignee_id: fields.optional_id(ASSIGNEE_ID)?,
        })
    }

    fn to_fields(task: &Task) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(TITLE.into(), Value::from(task.title.as_str()));
        fields.insert(DESCRIPTION.into(), Value::from(task.description.as_str()));
        fields.insert(PRIORITY.into(), Value::from(task.priority.as_str()));
        fields.insert(STATUS.into(), Value::from(task.status.as_str()));
        fields.insert(DUE_DATE.into(), optional_time_value(task.due_date));
        fields.insert(ASSIGNEE_ID.into(), optional_id_value(task.assignee_id));
        fields
    }

    fn draft_fields(draft: &NewTask, _now: DateTime<Utc>) -> Result<FieldMap, ValidationError> {
        draft.validate()?;
        let mut fields = FieldMap::new();
        fields.insert(TITLE.into(), Value::from(draft.title.trim()));
        fields.insert(DESCRIPTION.into(), Value::from(draft.description.as_str()));
        fields.insert(PRIORITY.into(), Value::from(draft.priority.as_str()));
        let status = draft.status.unwrap_or(TaskStatus::Todo);
        fields.insert(STATUS.into(), Value::from(status.as_str()));
        fields.insert(DUE_DATE.into(), optional_time_value(draft.due_date));
        fields.insert(ASSIGNEE_ID.into(), optional_id_value(draft.assignee_id));
        Ok(fields)
    }

    fn patch_fields(patch: &TaskPatch) -> Result<FieldMap, ValidationError> {
        patch.validate()?;
        let mut fields = FieldMap::new();
        if let Some(title) = &patch.title {
            fields.insert(TITLE.into(), Value::from(title.trim()));
        }
        if let Some(description) = &patch.description {
            fields.insert(DESCRIPTION.into(), Value::from(description.as_str()));
        }
        if let Some(priority) = patch.priority {
            fields.insert(PRIORITY.into(), Value::from(priority.as_str()));
        }
        if let Some(status) = patch.status {
            fields.insert(STATUS.into(), Value::from(status.as_str()));
        }
        if let Some(due_date) = patch.due_date {
            fields.insert(DUE_DATE.into(), optional_time_value(due_date));
        }
        if let Some(assignee_id) = patch.assignee_id {
            fields.insert(ASSIGNEE_ID.into(), optional_id_value(assignee_id));
        }
        Ok(fields)
    }
}

impl RecordAdapter<TaskRecords> {
    pub fn get_by_status(&self, status: TaskStatus) -> AdapterResult<Vec<Task>> {
        self.query(
            Operation::Load,
            vec![Condition::equal(STATUS, status.as_str())],
        )
    }

    pub fn get_by_priority(&self, priority: Priority) -> AdapterResult<Vec<Task>> {
        self.query(
            Operation::Load,
            vec![Condition::equal(PRIORITY, priority.as_str())],
        )
    }

    pub fn get_by_assignee(&self, assignee_id: RecordId) -> AdapterResult<Vec<Task>> {
        self.query(
            Operation::Load,
            vec![Condition::equal(ASSIGNEE_ID, assignee_id)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::TaskRecords;
    use crate::adapter::RecordMapping;
    use crate::model::task::{NewTask, Priority, Task, TaskPatch, TaskStatus};
    use crate::record::Record;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn sample() -> Task {
        Task {
            id: 11,
            title: "Quarterly report".to_string(),
            description: "numbers".to_string(),
            priority: Priority::High,
            status: TaskStatus::InProgress,
            due_date: Some(Utc.with_ymd_and_hms(2024, 5, 2, 17, 0, 0).unwrap()),
            assignee_id: Some(3),
        }
    }

    #[test]
    fn entity_survives_remote_roundtrip() {
        let task = sample();
        let record = Record::new(task.id, TaskRecords::to_fields(&task));
        assert_eq!(TaskRecords::from_record(&record).unwrap(), task);
    }

    #[test]
    fn sub_millisecond_due_date_survives_roundtrip() {
        let mut task = sample();
        task.due_date = Some(Utc.timestamp_opt(1_715_000_000, 123_456_789).unwrap());
        let record = Record::new(task.id, TaskRecords::to_fields(&task));
        assert_eq!(TaskRecords::from_record(&record).unwrap(), task);

        task.due_date = Some(Utc::now());
        let record = Record::new(task.id, TaskRecords::to_fields(&task));
        assert_eq!(TaskRecords::from_record(&record).unwrap(), task);
    }

    #[test]
    fn draft_defaults_status_to_todo() {
        let fields = TaskRecords::draft_fields(&NewTask::new("Plan", Priority::Low), Utc::now())
            .unwrap();
        assert_eq!(fields["status_c"], json!("todo"));
        assert_eq!(fields["due_date_c"], json!(null));
    }

    #[test]
    fn patch_emits_only_present_fields() {
        assert!(TaskRecords::patch_fields(&TaskPatch::default())
            .unwrap()
            .is_empty());

        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            assignee_id: Some(None),
            ..TaskPatch::default()
        };
        let fields = TaskRecords::patch_fields(&patch).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["status_c"], json!("completed"));
        assert_eq!(fields["assignee_id_c"], json!(null));
    }

    #[test]
    fn unknown_status_is_a_mapping_error() {
        let record: Record =
            serde_json::from_value(json!({"Id": 2, "title_c": "x", "status_c": "blocked"}))
                .unwrap();
        let err = TaskRecords::from_record(&record).unwrap_err();
        assert_eq!(err.field, "status_c");
    }
}
