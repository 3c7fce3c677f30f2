//! Schedule event entity.
//!
//! # Invariants
//! - `end_time` is never earlier than `start_time`.
//! - `attendees` keeps the order it was written in.

use super::{require_optional_text, require_text, RecordId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub title: String,
    /// Free-form tag such as `meeting` or `training`.
    #[serde(rename = "type")]
    pub kind: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    /// Employee ids.
    pub attendees: Vec<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScheduleEvent {
    pub title: String,
    pub kind: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub attendees: Vec<RecordId>,
}

impl NewScheduleEvent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        if self.end_time < self.start_time {
            return Err(ValidationError::EndBeforeStart);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleEventPatch {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub attendees: Option<Vec<RecordId>>,
}

impl ScheduleEventPatch {
    /// Only checks the time range when both ends are part of the patch; the
    /// record service holds the other end otherwise.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_optional_text("title", self.title.as_ref())?;
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end < start {
                return Err(ValidationError::EndBeforeStart);
            }
        }
        Ok(())
    }
}
