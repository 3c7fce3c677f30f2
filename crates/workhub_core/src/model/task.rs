//! Task entity.
//!
//! # Invariants
//! - `title` is never blank.
//! - `status` defaults to `todo` when a draft does not set one.

use super::{require_optional_text, require_text, RecordId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Sort weight, higher is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    /// Employee responsible for the task.
    pub assignee_id: Option<RecordId>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Open task whose due date lies before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => !self.is_completed() && due < now,
            None => false,
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// `None` creates the task as `todo`.
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
    pub assignee_id: Option<RecordId>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority,
            status: None,
            due_date: None,
            assignee_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }
}

/// Partial update for a task.
///
/// Nullable columns use `Option<Option<_>>`: the outer `None` leaves the
/// field untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub assignee_id: Option<Option<RecordId>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_optional_text("title", self.title.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTask, Priority, Task, TaskPatch, TaskStatus};
    use chrono::{Duration, Utc};

    #[test]
    fn status_strings_roundtrip() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("done"), None);
    }

    #[test]
    fn overdue_ignores_completed_and_undated_tasks() {
        let now = Utc::now();
        let mut task = Task {
            id: 1,
            title: "report".to_string(),
            description: String::new(),
            priority: Priority::High,
            status: TaskStatus::Todo,
            due_date: Some(now - Duration::hours(1)),
            assignee_id: None,
        };
        assert!(task.is_overdue(now));

        task.status = TaskStatus::Completed;
        assert!(!task.is_overdue(now));

        task.status = TaskStatus::Todo;
        task.due_date = None;
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(NewTask::new("  ", Priority::Low).validate().is_err());
        let patch = TaskPatch {
            title: Some(String::new()),
            ..TaskPatch::default()
        };
        assert!(patch.validate().is_err());
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn serializes_ui_shape() {
        let task = Task {
            id: 4,
            title: "ship".to_string(),
            description: String::new(),
            priority: Priority::Medium,
            status: TaskStatus::InProgress,
            due_date: None,
            assignee_id: Some(2),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["Id"], 4);
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["assigneeId"], 2);
    }
}
