//! Schedule event collection mapping and calendar queries.

use super::fields::{id_list_value, time_value, FieldReader, FieldSpec};
use super::{AdapterResult, MappingError, Operation, RecordAdapter, RecordMapping};
use crate::model::event::{NewScheduleEvent, ScheduleEvent, ScheduleEventPatch};
use crate::model::{RecordId, ValidationError};
use crate::record::{Condition, FieldMap, Operator, Record, SortDirection};
use chrono::{DateTime, Utc};
use serde_json::Value;

const TITLE: &str = "title_c";
const KIND: &str = "type_c";
const START_TIME: &str = "start_time_c";
const END_TIME: &str = "end_time_c";
const LOCATION: &str = "location_c";
const ATTENDEES: &str = "attendees_c";

pub struct ScheduleEventRecords;

pub type ScheduleEventAdapter = RecordAdapter<ScheduleEventRecords>;

impl RecordMapping for ScheduleEventRecords {
    type Entity = ScheduleEvent;
    type Draft = NewScheduleEvent;
    type Patch = ScheduleEventPatch;

    const COLLECTION: &'static str = "schedule_event_c";
    const NOUN: &'static str = "event";
    const PLURAL: &'static str = "schedule events";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec { ui: "title", remote: TITLE },
        FieldSpec { ui: "type", remote: KIND },
        FieldSpec { ui: "startTime", remote: START_TIME },
        FieldSpec { ui: "endTime", remote: END_TIME },
        FieldSpec { ui: "location", remote: LOCATION },
        FieldSpec { ui: "attendees", remote: ATTENDEES },
    ];
    const DEFAULT_ORDER: (&'static str, SortDirection) = (START_TIME, SortDirection::Asc);

    fn id(entity: &ScheduleEvent) -> RecordId {
        entity.id
    }

    fn from_record(record: &Record) -> Result<ScheduleEvent, MappingError> {
        let fields = FieldReader::new(Self::COLLECTION, record);
        Ok(ScheduleEvent {
            id: record.id,
            title: fields.required_text(TITLE)?,
            kind: fields.text(KIND)?,
            start_time: fields.time(START_TIME)?,
            end_time: fields.time(END_TIME)?,
            location: fields.text(LOCATION)?,
            attendees: fields.id_list(ATTENDEES)?,
        })
    }

    fn to_fields(event: &ScheduleEvent) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(TITLE.into(), Value::from(event.title.as_str()));
        fields.insert(KIND.into(), Value::from(event.kind.as_str()));
        fields.insert(START_TIME.into(), time_value(event.start_time));
        fields.insert(END_TIME.into(), time_value(event.end_time));
        fields.insert(LOCATION.into(), Value::from(event.location.as_str()));
        fields.insert(ATTENDEES.into(), id_list_value(&event.attendees));
        fields
    }

    fn draft_fields(
        draft: &NewScheduleEvent,
        _now: DateTime<Utc>,
    ) -> Result<FieldMap, ValidationError> {
        draft.validate()?;
        let mut fields = FieldMap::new();
        fields.insert(TITLE.into(), Value::from(draft.title.trim()));
        fields.insert(KIND.into(), Value::from(draft.kind.as_str()));
        fields.insert(START_TIME.into(), time_value(draft.start_time));
        fields.insert(END_TIME.into(), time_value(draft.end_time));
        fields.insert(LOCATION.into(), Value::from(draft.location.as_str()));
        fields.insert(ATTENDEES.into(), id_list_value(&draft.attendees));
        Ok(fields)
    }

    fn patch_fields(patch: &ScheduleEventPatch) -> Result<FieldMap, ValidationError> {
        patch.validate()?;
        let mut fields = FieldMap::new();
        if let Some(title) = &patch.title {
            fields.insert(TITLE.into(), Value::from(title.trim()));
        }
        if let Some(kind) = &patch.kind {
            fields.insert(KIND.into(), Value::from(kind.as_str()));
        }
        if let Some(start) = patch.start_time {
            fields.insert(START_TIME.into(), time_value(start));
        }
        if let Some(end) = patch.end_time {
            fields.insert(END_TIME.into(), time_value(end));
        }
        if let Some(location) = &patch.location {
            fields.insert(LOCATION.into(), Value::from(location.as_str()));
        }
        if let Some(attendees) = &patch.attendees {
            fields.insert(ATTENDEES.into(), id_list_value(attendees));
        }
        Ok(fields)
    }
}

impl RecordAdapter<ScheduleEventRecords> {
    /// Events starting within `[start, end]`, both ends inclusive.
    pub fn get_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AdapterResult<Vec<ScheduleEvent>> {
        self.query(
            Operation::Load,
            vec![
                Condition::new(START_TIME, Operator::GreaterThanOrEqualTo, time_value(start)),
                Condition::new(START_TIME, Operator::LessThanOrEqualTo, time_value(end)),
            ],
        )
    }

    pub fn get_by_type(&self, kind: &str) -> AdapterResult<Vec<ScheduleEvent>> {
        self.query(Operation::Load, vec![Condition::equal(KIND, kind)])
    }
}
