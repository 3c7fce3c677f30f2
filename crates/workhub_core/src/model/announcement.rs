//! Announcement entity.
//!
//! # Invariants
//! - `is_read` starts `false` and only changes through mark-as-read, so
//!   neither the draft nor the patch carries it.
//! - `date` is stamped at creation time.

use super::{require_optional_text, require_text, RecordId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub date: DateTime<Utc>,
    /// Free-form tag such as `company` or `hr`.
    pub category: String,
    pub is_read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
}

impl NewAnnouncement {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
}

impl AnnouncementPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_optional_text("title", self.title.as_ref())?;
        require_optional_text("content", self.content.as_ref())
    }
}
