//! Announcement collection mapping, feed queries and mark-as-read.

use super::fields::{time_value, FieldReader, FieldSpec};
use super::{AdapterResult, MappingError, Operation, RecordAdapter, RecordMapping};
use crate::model::announcement::{Announcement, AnnouncementPatch, NewAnnouncement};
use crate::model::{RecordId, ValidationError};
use crate::record::{Condition, FieldMap, Record, SortDirection};
use chrono::{DateTime, Utc};
use serde_json::Value;

const TITLE: &str = "title_c";
const CONTENT: &str = "content_c";
const AUTHOR: &str = "author_c";
const DATE: &str = "date_c";
const CATEGORY: &str = "category_c";
const IS_READ: &str = "is_read_c";

pub struct AnnouncementRecords;

pub type AnnouncementAdapter = RecordAdapter<AnnouncementRecords>;

impl RecordMapping for AnnouncementRecords {
    type Entity = Announcement;
    type Draft = NewAnnouncement;
    type Patch = AnnouncementPatch;

    const COLLECTION: &'static str = "announcement_c";
    const NOUN: &'static str = "announcement";
    const PLURAL: &'static str = "announcements";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec { ui: "title", remote: TITLE },
        FieldSpec { ui: "content", remote: CONTENT },
        FieldSpec { ui: "author", remote: AUTHOR },
        FieldSpec { ui: "date", remote: DATE },
        FieldSpec { ui: "category", remote: CATEGORY },
        FieldSpec { ui: "isRead", remote: IS_READ },
    ];
    const DEFAULT_ORDER: (&'static str, SortDirection) = (DATE, SortDirection::Desc);

    fn id(entity: &Announcement) -> RecordId {
        entity.id
    }

    fn from_record(record: &Record) -> Result<Announcement, MappingError> {
        let fields = FieldReader::new(Self::COLLECTION, record);
        Ok(Announcement {
            id: record.id,
            title: fields.required_text(TITLE)?,
            content: fields.text(CONTENT)?,
            author: fields.text(AUTHOR)?,
            date: fields.time(DATE)?,
            category: fields.text(CATEGORY)?,
            is_read: fields.flag(IS_READ)?,
        })
    }

    fn to_fields(announcement: &Announcement) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(TITLE.into(), Value::from(announcement.title.as_str()));
        fields.insert(CONTENT.into(), Value::from(announcement.content.as_str()));
        fields.insert(AUTHOR.into(), Value::from(announcement.author.as_str()));
        fields.insert(DATE.into(), time_value(announcement.date));
        fields.insert(CATEGORY.into(), Value::from(announcement.category.as_str()));
        fields.insert(IS_READ.into(), Value::Bool(announcement.is_read));
        fields
    }

    /// New announcements are dated `now` and start unread.
    fn draft_fields(
        draft: &NewAnnouncement,
        now: DateTime<Utc>,
    ) -> Result<FieldMap, ValidationError> {
        draft.validate()?;
        let mut fields = FieldMap::new();
        fields.insert(TITLE.into(), Value::from(draft.title.trim()));
        fields.insert(CONTENT.into(), Value::from(draft.content.as_str()));
        fields.insert(AUTHOR.into(), Value::from(draft.author.as_str()));
        fields.insert(DATE.into(), time_value(now));
        fields.insert(CATEGORY.into(), Value::from(draft.category.as_str()));
        fields.insert(IS_READ.into(), Value::Bool(false));
        Ok(fields)
    }

    fn patch_fields(patch: &AnnouncementPatch) -> Result<FieldMap, ValidationError> {
        patch.validate()?;
        let mut fields = FieldMap::new();
        if let Some(title) = &patch.title {
            fields.insert(TITLE.into(), Value::from(title.trim()));
        }
        if let Some(content) = &patch.content {
            fields.insert(CONTENT.into(), Value::from(content.as_str()));
        }
        if let Some(author) = &patch.author {
            fields.insert(AUTHOR.into(), Value::from(author.as_str()));
        }
        if let Some(category) = &patch.category {
            fields.insert(CATEGORY.into(), Value::from(category.as_str()));
        }
        Ok(fields)
    }
}

impl RecordAdapter<AnnouncementRecords> {
    /// Sends `is_read = true` and nothing else.
    pub fn mark_as_read(&self, id: RecordId) -> AdapterResult<Announcement> {
        let mut fields = FieldMap::new();
        fields.insert(IS_READ.into(), Value::Bool(true));
        self.update_fields(Operation::MarkRead, id, fields)
    }

    pub fn get_unread(&self) -> AdapterResult<Vec<Announcement>> {
        self.query(Operation::Load, vec![Condition::equal(IS_READ, false)])
    }

    pub fn get_by_category(&self, category: &str) -> AdapterResult<Vec<Announcement>> {
        self.query(Operation::Load, vec![Condition::equal(CATEGORY, category)])
    }
}

#[cfg(test)]
mod tests {
    use super::AnnouncementRecords;
    use crate::adapter::RecordMapping;
    use crate::model::announcement::{Announcement, NewAnnouncement};
    use crate::record::Record;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn entity_survives_remote_roundtrip() {
        let announcement = Announcement {
            id: 7,
            title: "Office closed".to_string(),
            content: "Friday".to_string(),
            author: "HR".to_string(),
            date: Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap(),
            category: "company".to_string(),
            is_read: true,
        };
        let record = Record::new(7, AnnouncementRecords::to_fields(&announcement));
        assert_eq!(
            AnnouncementRecords::from_record(&record).unwrap(),
            announcement
        );
    }

    #[test]
    fn draft_is_stamped_unread_at_now() {
        let now = Utc.with_ymd_and_hms(2024, 7, 2, 12, 0, 0).unwrap();
        let draft = NewAnnouncement {
            title: "Welcome".to_string(),
            content: "Say hi".to_string(),
            author: "Ops".to_string(),
            category: "team".to_string(),
        };
        let fields = AnnouncementRecords::draft_fields(&draft, now).unwrap();
        assert_eq!(fields["is_read_c"], json!(false));
        assert_eq!(fields["date_c"], json!("2024-07-02T12:00:00.000000000Z"));
    }

    #[test]
    fn current_date_survives_roundtrip() {
        let announcement = Announcement {
            id: 3,
            title: "Release".to_string(),
            content: "Shipped".to_string(),
            author: "Eng".to_string(),
            date: Utc::now(),
            category: "engineering".to_string(),
            is_read: false,
        };
        let record = Record::new(3, AnnouncementRecords::to_fields(&announcement));
        assert_eq!(
            AnnouncementRecords::from_record(&record).unwrap(),
            announcement
        );
    }
}
