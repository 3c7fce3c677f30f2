//! Dashboard widgets derived from all four collections.

use super::local_date;
use crate::model::announcement::Announcement;
use crate::model::employee::Employee;
use crate::model::event::ScheduleEvent;
use crate::model::task::Task;
use chrono::{DateTime, Duration, TimeZone, Utc};

const UPCOMING_LIMIT: usize = 3;
const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_tasks: usize,
    /// Tasks due today in the viewer's time zone.
    pub today_total: usize,
    pub today_completed: usize,
    /// Percentage of today's tasks completed, `0.0` when none are due.
    pub completion_rate: f64,
    pub overdue: usize,
    pub events_today: usize,
    pub unread_announcements: usize,
    /// Up to three events starting today or tomorrow, in list order.
    pub upcoming_events: Vec<ScheduleEvent>,
    /// The three newest announcements.
    pub recent_announcements: Vec<Announcement>,
}

pub fn summarize<Tz: TimeZone>(
    tasks: &[Task],
    events: &[ScheduleEvent],
    announcements: &[Announcement],
    now: &DateTime<Tz>,
) -> DashboardSummary {
    let tz = now.timezone();
    let today = now.date_naive();
    let tomorrow = today + Duration::days(1);
    let now_utc = now.with_timezone(&Utc);

    let due_today: Vec<&Task> = tasks
        .iter()
        .filter(|task| {
            task.due_date
                .map_or(false, |due| local_date(due, &tz) == today)
        })
        .collect();
    let today_completed = due_today.iter().filter(|task| task.is_completed()).count();
    let completion_rate = if due_today.is_empty() {
        0.0
    } else {
        today_completed as f64 * 100.0 / due_today.len() as f64
    };

    let upcoming_events = events
        .iter()
        .filter(|event| {
            let day = local_date(event.start_time, &tz);
            day == today || day == tomorrow
        })
        .take(UPCOMING_LIMIT)
        .cloned()
        .collect();

    let mut recent_announcements = announcements.to_vec();
    recent_announcements.sort_by(|a, b| b.date.cmp(&a.date));
    recent_announcements.truncate(RECENT_LIMIT);

    DashboardSummary {
        total_tasks: tasks.len(),
        today_total: due_today.len(),
        today_completed,
        completion_rate,
        overdue: tasks.iter().filter(|task| task.is_overdue(now_utc)).count(),
        events_today: events
            .iter()
            .filter(|event| local_date(event.start_time, &tz) == today)
            .count(),
        unread_announcements: announcements.iter().filter(|a| !a.is_read).count(),
        upcoming_events,
        recent_announcements,
    }
}

/// Employees attending `event`, in directory order. Unknown ids are
/// skipped.
pub fn resolve_attendees<'a>(event: &ScheduleEvent, employees: &'a [Employee]) -> Vec<&'a Employee> {
    employees
        .iter()
        .filter(|employee| event.attendees.contains(&employee.id))
        .collect()
}
