//! Demo data for a fresh local backend.

use chrono::{Duration, Utc};
use log::info;
use workhub_core::{
    EmployeeStatus, NewAnnouncement, NewEmployee, NewScheduleEvent, NewTask, Portal, Priority,
    TaskStatus,
};

pub fn run(portal: &Portal) -> anyhow::Result<()> {
    let now = Utc::now();

    let mut ids = Vec::new();
    for (name, role, department, status) in [
        ("Maya Chen", "Engineering Manager", "Engineering", EmployeeStatus::Active),
        ("Luis Ortega", "Backend Engineer", "Engineering", EmployeeStatus::Busy),
        ("Priya Nair", "Product Designer", "Design", EmployeeStatus::Active),
        ("Tom Becker", "Account Executive", "Sales", EmployeeStatus::Away),
    ] {
        let email = format!("{}@workhub.example", name.to_lowercase().replace(' ', "."));
        let mut draft = NewEmployee::new(name, email, department);
        draft.role = role.to_string();
        draft.status = Some(status);
        ids.push(portal.employees().create(&draft)?.id);
    }

    for (title, priority, status, due_in_days, assignee) in [
        ("Review Q3 roadmap", Priority::High, TaskStatus::Todo, 0, 0),
        ("Fix login redirect", Priority::High, TaskStatus::InProgress, -1, 1),
        ("Update onboarding guide", Priority::Medium, TaskStatus::Todo, 3, 2),
        ("Book team offsite", Priority::Low, TaskStatus::Completed, 0, 3),
    ] {
        let mut draft = NewTask::new(title, priority);
        draft.status = Some(status);
        draft.due_date = Some(now + Duration::days(due_in_days));
        draft.assignee_id = ids.get(assignee).copied();
        portal.tasks().create(&draft)?;
    }

    for (title, kind, starts_in_hours, minutes, location) in [
        ("Daily standup", "meeting", 1, 15, "Room Atlas"),
        ("Design critique", "review", 26, 60, "Studio"),
        ("Security training", "training", 50, 90, "Online"),
    ] {
        let start = now + Duration::hours(starts_in_hours);
        portal.events().create(&NewScheduleEvent {
            title: title.to_string(),
            kind: kind.to_string(),
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            location: location.to_string(),
            attendees: ids.clone(),
        })?;
    }

    for (title, category, author) in [
        ("Office closed on Friday", "company", "Facilities"),
        ("New expense policy", "hr", "People Ops"),
        ("Release 2.4 shipped", "engineering", "Maya Chen"),
    ] {
        portal.announcements().create(&NewAnnouncement {
            title: title.to_string(),
            content: format!("{title}. Details are on the intranet."),
            author: author.to_string(),
            category: category.to_string(),
        })?;
    }

    info!(
        "event=seed module=cli status=ok employees={} tasks=4 events=3 announcements=3",
        ids.len()
    );
    println!("seeded demo data");
    Ok(())
}
