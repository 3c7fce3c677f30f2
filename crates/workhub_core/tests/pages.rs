mod common;

use chrono::{Duration, Utc};
use common::harness;
use workhub_core::page::PageStatus;
use workhub_core::view::announcements::{AnnouncementFilter, AnnouncementSort};
use workhub_core::view::calendar::WeekCursor;
use workhub_core::view::tasks::{TaskFilter, TaskSort};
use workhub_core::view::team::TeamFilter;
use workhub_core::{
    EmployeeStatus, NewAnnouncement, NewEmployee, NewScheduleEvent, NewTask, Page, Priority,
    Severity, TaskStatus,
};

#[test]
fn dashboard_mount_loads_all_four_collections() {
    let h = harness();
    let now = Utc::now();
    let mut due_today = NewTask::new("due today", Priority::High);
    due_today.due_date = Some(now + Duration::minutes(1));
    h.portal.tasks().create(&due_today).unwrap();
    let ada = h
        .portal
        .employees()
        .create(&NewEmployee::new("Ada", "ada@example.com", "Platform"))
        .unwrap();
    h.portal
        .events()
        .create(&NewScheduleEvent {
            title: "Standup".to_string(),
            kind: "meeting".to_string(),
            start_time: now + Duration::minutes(1),
            end_time: now + Duration::minutes(16),
            location: "Room 2".to_string(),
            attendees: vec![ada.id],
        })
        .unwrap();
    h.portal
        .announcements()
        .create(&NewAnnouncement {
            title: "Welcome".to_string(),
            content: "hi".to_string(),
            author: "HR".to_string(),
            category: "company".to_string(),
        })
        .unwrap();

    let page = h.portal.dashboard();
    page.mount().unwrap();
    assert_eq!(page.status(), PageStatus::Ready);
    assert_eq!(page.employees.len(), 1);

    let summary = page.summary(&now);
    assert_eq!(summary.total_tasks, 1);
    assert_eq!(summary.unread_announcements, 1);
    assert_eq!(summary.recent_announcements.len(), 1);
}

#[test]
fn one_failing_store_fails_the_page_and_retry_recovers() {
    let h = harness();
    h.client.fail_fetches(Some("backend offline"));

    let page = h.portal.schedule();
    assert!(page.mount().is_err());
    match page.status() {
        PageStatus::Failed(message) => assert!(message.contains("backend offline")),
        other => panic!("unexpected status {other:?}"),
    }
    assert_eq!(h.notifier.count(Severity::Error), 2);

    h.client.fail_fetches(None);
    page.retry().unwrap();
    assert_eq!(page.status(), PageStatus::Ready);
}

#[test]
fn second_mount_is_a_no_op() {
    let h = harness();
    let page = h.portal.team();
    page.mount().unwrap();
    h.portal
        .employees()
        .create(&NewEmployee::new("Late", "late@example.com", "Ops"))
        .unwrap();

    page.mount().unwrap();
    assert!(page.employees.is_empty());
    page.retry().unwrap();
    assert_eq!(page.departments(), vec!["Ops"]);
}

#[test]
fn tasks_page_actions_update_views() {
    let h = harness();
    let page = h.portal.tasks_page();
    page.mount().unwrap();
    let first = page
        .tasks
        .create(&NewTask::new("first", Priority::High))
        .unwrap();
    let second = page
        .tasks
        .create(&NewTask::new("second", Priority::Low))
        .unwrap();
    let now = Utc::now();

    page.change_status(first.id, TaskStatus::Completed).unwrap();
    let counts = page.counts(now);
    assert_eq!((counts.all, counts.completed, counts.pending), (2, 1, 1));
    let pending = page.visible(TaskFilter::Pending, TaskSort::Title, now);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.id);

    page.delete_task(second.id).unwrap();
    assert!(page.visible(TaskFilter::Pending, TaskSort::DueDate, now).is_empty());
    assert_eq!(h.notifier.count(Severity::Success), 4);
}

#[test]
fn schedule_and_team_views_read_store_snapshots() {
    let h = harness();
    let ada = h
        .portal
        .employees()
        .create(&NewEmployee::new("Ada", "ada@example.com", "Platform"))
        .unwrap();
    let mut bo = NewEmployee::new("Bo", "bo@example.com", "Sales");
    bo.status = Some(EmployeeStatus::Away);
    h.portal.employees().create(&bo).unwrap();
    let now = Utc::now();
    let event = h
        .portal
        .events()
        .create(&NewScheduleEvent {
            title: "Review".to_string(),
            kind: "meeting".to_string(),
            start_time: now,
            end_time: now + Duration::minutes(30),
            location: String::new(),
            attendees: vec![ada.id],
        })
        .unwrap();

    let schedule = h.portal.schedule();
    schedule.mount().unwrap();
    let week = schedule.week(WeekCursor::today(&now), &now);
    let today = week.iter().find(|day| day.is_today).unwrap();
    assert_eq!(today.events.len(), 1);
    assert_eq!(schedule.attendees(&event)[0].name, "Ada");
    assert!(schedule
        .week(WeekCursor::today(&now).next(), &now)
        .iter()
        .all(|day| day.events.is_empty()));

    let team = h.portal.team();
    team.mount().unwrap();
    let filter = TeamFilter {
        search: "bo".to_string(),
        ..TeamFilter::default()
    };
    assert_eq!(team.visible(&filter).len(), 1);
    assert_eq!(team.departments(), vec!["Platform", "Sales"]);
    let presence = team.presence();
    assert_eq!((presence.active, presence.away, presence.busy), (1, 1, 0));
}

#[test]
fn announcements_page_counts_follow_mark_as_read() {
    let h = harness();
    for title in ["one", "two"] {
        h.portal
            .announcements()
            .create(&NewAnnouncement {
                title: title.to_string(),
                content: String::from("text"),
                author: "Ops".to_string(),
                category: "company".to_string(),
            })
            .unwrap();
    }
    let page = h.portal.announcements_page();
    page.mount().unwrap();
    let first = page.announcements.items()[0].id;

    page.mark_as_read(first).unwrap();
    let counts = page.counts();
    assert_eq!((counts.unread, counts.read), (1, 1));
    assert_eq!(
        page.visible(&AnnouncementFilter::Read, AnnouncementSort::Date)[0].id,
        first
    );
}
