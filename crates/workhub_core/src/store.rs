//! Entity stores: the in-memory snapshot of one collection for one page.
//!
//! # Responsibility
//! - Hold the list a page renders and its load state.
//! - Route every mutation through the adapter and apply only confirmed
//!   results to the list.
//! - Report confirmed mutations on the notification channel.
//!
//! # Invariants
//! - `load` replaces the whole list; it never merges.
//! - A failed load leaves the list exactly as it was.
//! - Mutations never enter the `Loading` state.
//! - The list holds at most one entry per id.
//! - Failure notifications belong to the adapter; the store never repeats
//!   them.

use crate::adapter::{
    AdapterError, AnnouncementRecords, EmployeeRecords, RecordAdapter, RecordMapping,
    ScheduleEventRecords, TaskRecords,
};
use crate::model::announcement::Announcement;
use crate::model::RecordId;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

pub type TaskStore = EntityStore<TaskRecords>;
pub type EmployeeStore = EntityStore<EmployeeRecords>;
pub type ScheduleEventStore = EntityStore<ScheduleEventRecords>;
pub type AnnouncementStore = EntityStore<AnnouncementRecords>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Errored(String),
}

/// A store operation the adapter could not complete.
#[derive(Debug, Error)]
#[error("{action} failed: {source}")]
pub struct StoreError {
    pub action: &'static str,
    #[source]
    pub source: AdapterError,
}

impl StoreError {
    fn new(action: &'static str, source: AdapterError) -> Self {
        Self { action, source }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Object-safe view of a store for page-level composition.
pub trait LoadableStore: Send + Sync {
    fn load(&self) -> StoreResult<()>;

    /// Runs the first `load` only; later calls are no-ops.
    fn mount(&self) -> StoreResult<()>;

    fn is_loading(&self) -> bool;

    /// Message of the last failed load, if it has not been cleared by a
    /// newer load.
    fn error(&self) -> Option<String>;
}

struct StoreState<E> {
    items: Vec<E>,
    load: LoadState,
}

pub struct EntityStore<M: RecordMapping> {
    adapter: Arc<RecordAdapter<M>>,
    state: RwLock<StoreState<M::Entity>>,
    mounted: AtomicBool,
}

impl<M: RecordMapping> EntityStore<M> {
    pub fn new(adapter: Arc<RecordAdapter<M>>) -> Self {
        Self {
            adapter,
            state: RwLock::new(StoreState {
                items: Vec::new(),
                load: LoadState::Idle,
            }),
            mounted: AtomicBool::new(false),
        }
    }

    pub fn adapter(&self) -> &RecordAdapter<M> {
        &self.adapter
    }

    pub fn items(&self) -> Vec<M::Entity> {
        self.state.read().items.clone()
    }

    /// Borrows the current list without cloning it.
    pub fn with_items<R>(&self, read: impl FnOnce(&[M::Entity]) -> R) -> R {
        read(&self.state.read().items)
    }

    pub fn get(&self, id: RecordId) -> Option<M::Entity> {
        self.state
            .read()
            .items
            .iter()
            .find(|entity| M::id(entity) == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().items.is_empty()
    }

    pub fn load_state(&self) -> LoadState {
        self.state.read().load.clone()
    }

    pub fn load(&self) -> StoreResult<()> {
        self.state.write().load = LoadState::Loading;
        debug!(
            "event=store_load module=store status=start collection={}",
            M::COLLECTION
        );

        let outcome = self.adapter.get_all();
        let mut state = self.state.write();
        match outcome {
            Ok(entities) => {
                state.items = dedupe::<M>(entities);
                state.load = LoadState::Ready;
                debug!(
                    "event=store_load module=store status=ok collection={} count={}",
                    M::COLLECTION,
                    state.items.len()
                );
                Ok(())
            }
            Err(err) => {
                state.load = LoadState::Errored(err.to_string());
                Err(StoreError::new("load", err))
            }
        }
    }

    pub fn mount(&self) -> StoreResult<()> {
        if self.mounted.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.load()
    }

    /// Appends the created entity once the service confirms it.
    pub fn create(&self, draft: &M::Draft) -> StoreResult<M::Entity> {
        let created = self
            .adapter
            .create(draft)
            .map_err(|err| StoreError::new("create", err))?;
        {
            let mut state = self.state.write();
            let id = M::id(&created);
            state.items.retain(|entity| M::id(entity) != id);
            state.items.push(created.clone());
        }
        self.confirm("create", "created");
        Ok(created)
    }

    /// Replaces the entry with the same id, keeping its position.
    pub fn update(&self, id: RecordId, patch: &M::Patch) -> StoreResult<M::Entity> {
        let updated = self
            .adapter
            .update(id, patch)
            .map_err(|err| StoreError::new("update", err))?;
        self.replace(updated.clone());
        self.confirm("update", "updated");
        Ok(updated)
    }

    pub fn delete(&self, id: RecordId) -> StoreResult<()> {
        self.adapter
            .delete_one(id)
            .map_err(|err| StoreError::new("delete", err))?;
        self.state.write().items.retain(|entity| M::id(entity) != id);
        self.confirm("delete", "deleted");
        Ok(())
    }

    fn replace(&self, entity: M::Entity) {
        let id = M::id(&entity);
        let mut state = self.state.write();
        match state.items.iter_mut().find(|item| M::id(item) == id) {
            Some(slot) => *slot = entity,
            None => state.items.push(entity),
        }
    }

    fn confirm(&self, action: &str, past: &str) {
        info!(
            "event=store_mutation module=store status=ok collection={} action={action}",
            M::COLLECTION
        );
        self.adapter
            .notifier()
            .success(&format!("{} {past} successfully", capitalize(M::NOUN)));
    }
}

impl EntityStore<AnnouncementRecords> {
    /// Flips `is_read` on the one matching entry once the service confirms.
    pub fn mark_as_read(&self, id: RecordId) -> StoreResult<Announcement> {
        let updated = self
            .adapter
            .mark_as_read(id)
            .map_err(|err| StoreError::new("mark as read", err))?;
        self.replace(updated.clone());
        info!(
            "event=store_mutation module=store status=ok collection={} action=mark_read id={id}",
            AnnouncementRecords::COLLECTION
        );
        self.adapter.notifier().success("Marked as read");
        Ok(updated)
    }
}

impl<M: RecordMapping> LoadableStore for EntityStore<M> {
    fn load(&self) -> StoreResult<()> {
        EntityStore::load(self)
    }

    fn mount(&self) -> StoreResult<()> {
        EntityStore::mount(self)
    }

    fn is_loading(&self) -> bool {
        self.state.read().load == LoadState::Loading
    }

    fn error(&self) -> Option<String> {
        match &self.state.read().load {
            LoadState::Errored(message) => Some(message.clone()),
            _ => None,
        }
    }
}

/// Keeps the first occurrence of every id.
fn dedupe<M: RecordMapping>(entities: Vec<M::Entity>) -> Vec<M::Entity> {
    let mut seen = HashSet::with_capacity(entities.len());
    entities
        .into_iter()
        .filter(|entity| seen.insert(M::id(entity)))
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{capitalize, EntityStore, LoadState, LoadableStore};
    use crate::adapter::{portal_schemas, RecordAdapter, TaskRecords};
    use crate::model::task::{NewTask, Priority, TaskPatch, TaskStatus};
    use crate::notify::{RecordingNotifier, Severity};
    use crate::record::LocalRecordStore;
    use std::sync::Arc;

    fn task_store() -> (EntityStore<TaskRecords>, Arc<RecordingNotifier>) {
        let client = Arc::new(LocalRecordStore::open_in_memory(portal_schemas()).unwrap());
        let notifier = Arc::new(RecordingNotifier::new());
        let adapter = Arc::new(RecordAdapter::new(client, notifier.clone()));
        (EntityStore::new(adapter), notifier)
    }

    #[test]
    fn starts_idle_and_empty() {
        let (store, _) = task_store();
        assert_eq!(store.load_state(), LoadState::Idle);
        assert!(store.is_empty());
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[test]
    fn mount_loads_once() {
        let (store, _) = task_store();
        store.mount().unwrap();
        assert_eq!(store.load_state(), LoadState::Ready);

        store
            .adapter()
            .create(&NewTask::new("behind the store", Priority::Low))
            .unwrap();
        store.mount().unwrap();
        assert!(store.is_empty());

        store.load().unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn mutations_apply_in_place_and_notify_success() {
        let (store, notifier) = task_store();
        store.mount().unwrap();
        let first = store.create(&NewTask::new("first", Priority::High)).unwrap();
        let second = store.create(&NewTask::new("second", Priority::Low)).unwrap();

        store
            .update(first.id, &TaskPatch::status(TaskStatus::Completed))
            .unwrap();
        let items = store.items();
        assert_eq!(items[0].id, first.id);
        assert_eq!(items[0].status, TaskStatus::Completed);
        assert_eq!(items[1].id, second.id);

        store.delete(first.id).unwrap();
        assert_eq!(store.get(first.id), None);
        assert_eq!(notifier.count(Severity::Success), 4);
        assert_eq!(notifier.entries()[0].message, "Task created successfully");
    }

    #[test]
    fn capitalize_handles_empty() {
        assert_eq!(capitalize("task"), "Task");
        assert_eq!(capitalize(""), "");
    }
}
