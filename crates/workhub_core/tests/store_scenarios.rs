mod common;

use common::harness;
use serde_json::json;
use workhub_core::{
    EntityStore, LoadState, LoadableStore, NewAnnouncement, NewTask, Priority, Severity,
    TaskPatch, TaskStatus,
};

fn news(title: &str) -> NewAnnouncement {
    NewAnnouncement {
        title: title.to_string(),
        content: "body".to_string(),
        author: "HR".to_string(),
        category: "hr".to_string(),
    }
}

#[test]
fn remote_failure_on_first_load_leaves_empty_list_and_error() {
    let h = harness();
    h.portal
        .tasks()
        .create(&NewTask::new("exists remotely", Priority::Low))
        .unwrap();
    h.client.fail_fetches(Some("quota exceeded"));

    let page = h.portal.tasks_page();
    let result = page.tasks.mount();

    assert!(result.is_err());
    assert!(page.tasks.is_empty());
    let error = page.tasks.error().unwrap();
    assert!(error.contains("quota exceeded"));
    assert_eq!(page.tasks.load_state(), LoadState::Errored(error));
}

#[test]
fn failed_reload_keeps_previous_snapshot() {
    let h = harness();
    h.portal
        .tasks()
        .create(&NewTask::new("first", Priority::Low))
        .unwrap();
    let store = EntityStore::new(std::sync::Arc::new(workhub_core::TaskAdapter::new(
        h.client.clone(),
        h.notifier.clone(),
    )));
    store.mount().unwrap();
    assert_eq!(store.len(), 1);

    h.client.fail_fetches(Some("down for maintenance"));
    assert!(store.load().is_err());
    assert_eq!(store.len(), 1);
    assert!(store.error().is_some());

    h.client.fail_fetches(None);
    store.load().unwrap();
    assert_eq!(store.error(), None);
    assert_eq!(store.load_state(), LoadState::Ready);
}

#[test]
fn mark_as_read_sends_only_the_flag_and_flips_one_entry() {
    let h = harness();
    let adapter = h.portal.announcements();
    let mut created = Vec::new();
    for index in 0..8 {
        created.push(adapter.create(&news(&format!("note {index}"))).unwrap());
    }
    let target = created
        .iter()
        .find(|announcement| announcement.id == 7)
        .unwrap()
        .id;

    let page = h.portal.announcements_page();
    page.announcements.mount().unwrap();
    h.notifier.take();

    let updated = page.mark_as_read(target).unwrap();
    assert!(updated.is_read);

    let (collection, records) = h.client.updates().pop().unwrap();
    assert_eq!(collection, "announcement_c");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 7);
    assert_eq!(records[0].fields.len(), 1);
    assert_eq!(records[0].fields["is_read_c"], json!(true));

    for announcement in page.announcements.items() {
        assert_eq!(announcement.is_read, announcement.id == 7, "id {}", announcement.id);
    }
    let notes = h.notifier.take();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Success);
    assert_eq!(notes[0].message, "Marked as read");
}

#[test]
fn each_failure_notifies_exactly_once() {
    let h = harness();
    let page = h.portal.tasks_page();
    page.tasks.mount().unwrap();

    h.client.set_transport_down(true);
    assert!(page
        .tasks
        .create(&NewTask::new("offline", Priority::High))
        .is_err());
    assert!(page.change_status(1, TaskStatus::Completed).is_err());
    assert!(page.delete_task(1).is_err());
    assert!(page.tasks.load().is_err());

    assert_eq!(h.notifier.count(Severity::Error), 4);
    assert_eq!(h.notifier.count(Severity::Success), 0);
    let messages: Vec<_> = h.notifier.take().into_iter().map(|n| n.message).collect();
    assert!(messages[0].starts_with("Failed to create task"));
    assert!(messages[1].starts_with("Failed to update task"));
    assert!(messages[2].starts_with("Failed to delete task"));
    assert!(messages[3].starts_with("Failed to load tasks"));
}

#[test]
fn failed_mutation_leaves_list_untouched() {
    let h = harness();
    let page = h.portal.tasks_page();
    page.tasks.mount().unwrap();
    let task = page
        .tasks
        .create(&NewTask::new("keep me", Priority::Medium))
        .unwrap();

    h.client.refuse_delete(task.id);
    let err = page.delete_task(task.id).unwrap_err();
    assert_eq!(err.action, "delete");
    assert_eq!(page.tasks.items(), vec![task.clone()]);

    let missing = page
        .tasks
        .update(task.id + 100, &TaskPatch::status(TaskStatus::Completed))
        .unwrap_err();
    assert_eq!(missing.action, "update");
    assert_eq!(page.tasks.items(), vec![task]);
}

#[test]
fn created_entities_append_in_order() {
    let h = harness();
    let page = h.portal.announcements_page();
    page.announcements.mount().unwrap();

    let first = page.announcements.create(&news("first")).unwrap();
    let second = page.announcements.create(&news("second")).unwrap();
    let ids: Vec<_> = page.announcements.items().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert!(!page.announcements.is_loading());
}
