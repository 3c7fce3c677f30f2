//! Task tabs, counts and sort orders.

use super::compare_text;
use crate::model::task::{Priority, Task};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    /// Anything not completed.
    Pending,
    Completed,
    High,
    Overdue,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 5] = [
        Self::All,
        Self::Pending,
        Self::Completed,
        Self::High,
        Self::Overdue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::High => "high",
            Self::Overdue => "overdue",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.as_str() == value)
    }

    pub fn matches(self, task: &Task, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.is_completed(),
            Self::Completed => task.is_completed(),
            Self::High => task.priority == Priority::High,
            Self::Overdue => task.is_overdue(now),
        }
    }
}

impl Display for TaskFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    /// Earliest first; tasks without a due date go last.
    #[default]
    DueDate,
    /// High first.
    Priority,
    Status,
    Title,
}

impl TaskSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "due-date" | "dueDate" | "due_date" => Some(Self::DueDate),
            "priority" => Some(Self::Priority),
            "status" => Some(Self::Status),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    fn compare(self, left: &Task, right: &Task) -> Ordering {
        match self {
            Self::DueDate => match (left.due_date, right.due_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::Priority => right.priority.rank().cmp(&left.priority.rank()),
            Self::Status => left.status.as_str().cmp(right.status.as_str()),
            Self::Title => compare_text(&left.title, &right.title),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub all: usize,
    pub pending: usize,
    pub completed: usize,
    pub high: usize,
    pub overdue: usize,
}

impl TaskCounts {
    pub fn get(&self, filter: TaskFilter) -> usize {
        match filter {
            TaskFilter::All => self.all,
            TaskFilter::Pending => self.pending,
            TaskFilter::Completed => self.completed,
            TaskFilter::High => self.high,
            TaskFilter::Overdue => self.overdue,
        }
    }
}

pub fn task_counts(tasks: &[Task], now: DateTime<Utc>) -> TaskCounts {
    let count = |filter: TaskFilter| tasks.iter().filter(|task| filter.matches(task, now)).count();
    TaskCounts {
        all: tasks.len(),
        pending: count(TaskFilter::Pending),
        completed: count(TaskFilter::Completed),
        high: count(TaskFilter::High),
        overdue: count(TaskFilter::Overdue),
    }
}

/// Filtered then stably sorted copy of `tasks`.
pub fn visible_tasks(
    tasks: &[Task],
    filter: TaskFilter,
    sort: TaskSort,
    now: DateTime<Utc>,
) -> Vec<Task> {
    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| filter.matches(task, now))
        .cloned()
        .collect();
    visible.sort_by(|left, right| sort.compare(left, right));
    visible
}
