//! Page composition over entity stores.
//!
//! # Responsibility
//! - Build the adapters once per portal and hand every page its own
//!   fresh stores.
//! - Combine the load state of a page's stores into one status.
//! - Run a page's loads concurrently and wait for all of them.
//!
//! # Invariants
//! - Page status is `Loading` while any store loads, otherwise the first
//!   store error in declaration order, otherwise `Ready`.
//! - Retry reloads every store of the page, including ones that succeeded.

use crate::adapter::{
    AnnouncementAdapter, EmployeeAdapter, RecordAdapter, ScheduleEventAdapter, TaskAdapter,
};
use crate::config::{ConfigError, PortalConfig};
use crate::model::announcement::Announcement;
use crate::model::employee::Employee;
use crate::model::event::ScheduleEvent;
use crate::model::task::{Task, TaskPatch, TaskStatus};
use crate::model::RecordId;
use crate::notify::Notifier;
use crate::record::RecordClient;
use crate::store::{
    AnnouncementStore, EmployeeStore, EntityStore, LoadableStore, ScheduleEventStore,
    StoreResult, TaskStore,
};
use crate::view::announcements::{
    announcement_counts, visible_announcements, AnnouncementCounts, AnnouncementFilter,
    AnnouncementSort,
};
use crate::view::calendar::{week_grid, CalendarDay, WeekCursor};
use crate::view::dashboard::{resolve_attendees, summarize, DashboardSummary};
use crate::view::tasks::{task_counts, visible_tasks, TaskCounts, TaskFilter, TaskSort};
use crate::view::team::{
    departments, filter_employees, presence_counts, PresenceCounts, TeamFilter,
};
use chrono::{DateTime, TimeZone, Utc};
use log::info;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Loading,
    Failed(String),
    Ready,
}

pub fn combined_status(stores: &[&dyn LoadableStore]) -> PageStatus {
    if stores.iter().any(|store| store.is_loading()) {
        return PageStatus::Loading;
    }
    stores
        .iter()
        .find_map(|store| store.error())
        .map_or(PageStatus::Ready, PageStatus::Failed)
}

/// Runs `action` on every store concurrently. Returns the first error in
/// store order once every store has settled.
fn run_all<F>(stores: &[&dyn LoadableStore], action: F) -> StoreResult<()>
where
    F: Fn(&dyn LoadableStore) -> StoreResult<()> + Sync,
{
    let action = &action;
    let results: Vec<StoreResult<()>> = thread::scope(|scope| {
        let handles: Vec<_> = stores
            .iter()
            .map(|store| scope.spawn(move || action(*store)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    });
    results.into_iter().collect()
}

/// A screen composed of one or more stores.
pub trait Page {
    fn name(&self) -> &'static str;

    fn stores(&self) -> Vec<&dyn LoadableStore>;

    /// First-mount loads; a second call does nothing.
    fn mount(&self) -> StoreResult<()> {
        info!("event=page_mount module=page status=start page={}", self.name());
        run_all(&self.stores(), |store| store.mount())
    }

    fn retry(&self) -> StoreResult<()> {
        info!("event=page_retry module=page status=start page={}", self.name());
        run_all(&self.stores(), |store| store.load())
    }

    fn status(&self) -> PageStatus {
        combined_status(&self.stores())
    }
}

/// Shared adapters for every page. Built once, cloned into stores.
#[derive(Clone)]
pub struct Portal {
    tasks: Arc<TaskAdapter>,
    employees: Arc<EmployeeAdapter>,
    events: Arc<ScheduleEventAdapter>,
    announcements: Arc<AnnouncementAdapter>,
}

impl Portal {
    pub fn new(client: Arc<dyn RecordClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            tasks: Arc::new(RecordAdapter::new(client.clone(), notifier.clone())),
            employees: Arc::new(RecordAdapter::new(client.clone(), notifier.clone())),
            events: Arc::new(RecordAdapter::new(client.clone(), notifier.clone())),
            announcements: Arc::new(RecordAdapter::new(client, notifier)),
        }
    }

    pub fn from_config(
        config: &PortalConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ConfigError> {
        let client = config.backend.connect()?;
        info!(
            "event=portal_open module=page status=ok backend={}",
            config.backend.describe()
        );
        Ok(Self::new(client, notifier))
    }

    pub fn tasks(&self) -> &TaskAdapter {
        &self.tasks
    }

    pub fn employees(&self) -> &EmployeeAdapter {
        &self.employees
    }

    pub fn events(&self) -> &ScheduleEventAdapter {
        &self.events
    }

    pub fn announcements(&self) -> &AnnouncementAdapter {
        &self.announcements
    }

    pub fn dashboard(&self) -> DashboardPage {
        DashboardPage {
            tasks: EntityStore::new(self.tasks.clone()),
            events: EntityStore::new(self.events.clone()),
            announcements: EntityStore::new(self.announcements.clone()),
            employees: EntityStore::new(self.employees.clone()),
        }
    }

    pub fn tasks_page(&self) -> TasksPage {
        TasksPage {
            tasks: EntityStore::new(self.tasks.clone()),
        }
    }

    pub fn schedule(&self) -> SchedulePage {
        SchedulePage {
            events: EntityStore::new(self.events.clone()),
            employees: EntityStore::new(self.employees.clone()),
        }
    }

    pub fn team(&self) -> TeamPage {
        TeamPage {
            employees: EntityStore::new(self.employees.clone()),
        }
    }

    pub fn announcements_page(&self) -> AnnouncementsPage {
        AnnouncementsPage {
            announcements: EntityStore::new(self.announcements.clone()),
        }
    }
}

pub struct DashboardPage {
    pub tasks: TaskStore,
    pub events: ScheduleEventStore,
    pub announcements: AnnouncementStore,
    pub employees: EmployeeStore,
}

impl Page for DashboardPage {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn stores(&self) -> Vec<&dyn LoadableStore> {
        vec![
            &self.tasks as &dyn LoadableStore,
            &self.events as &dyn LoadableStore,
            &self.announcements as &dyn LoadableStore,
            &self.employees as &dyn LoadableStore,
        ]
    }
}

impl DashboardPage {
    pub fn summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DashboardSummary {
        self.tasks.with_items(|tasks| {
            self.events.with_items(|events| {
                self.announcements
                    .with_items(|announcements| summarize(tasks, events, announcements, now))
            })
        })
    }
}

pub struct TasksPage {
    pub tasks: TaskStore,
}

impl Page for TasksPage {
    fn name(&self) -> &'static str {
        "tasks"
    }

    fn stores(&self) -> Vec<&dyn LoadableStore> {
        vec![&self.tasks as &dyn LoadableStore]
    }
}

impl TasksPage {
    pub fn change_status(&self, id: RecordId, status: TaskStatus) -> StoreResult<Task> {
        self.tasks.update(id, &TaskPatch::status(status))
    }

    pub fn delete_task(&self, id: RecordId) -> StoreResult<()> {
        self.tasks.delete(id)
    }

    pub fn visible(&self, filter: TaskFilter, sort: TaskSort, now: DateTime<Utc>) -> Vec<Task> {
        self.tasks
            .with_items(|tasks| visible_tasks(tasks, filter, sort, now))
    }

    pub fn counts(&self, now: DateTime<Utc>) -> TaskCounts {
        self.tasks.with_items(|tasks| task_counts(tasks, now))
    }
}

pub struct SchedulePage {
    pub events: ScheduleEventStore,
    pub employees: EmployeeStore,
}

impl Page for SchedulePage {
    fn name(&self) -> &'static str {
        "schedule"
    }

    fn stores(&self) -> Vec<&dyn LoadableStore> {
        vec![
            &self.events as &dyn LoadableStore,
            &self.employees as &dyn LoadableStore,
        ]
    }
}

impl SchedulePage {
    pub fn week<Tz: TimeZone>(&self, week: WeekCursor, now: &DateTime<Tz>) -> Vec<CalendarDay> {
        self.events.with_items(|events| week_grid(events, week, now))
    }

    pub fn attendees(&self, event: &ScheduleEvent) -> Vec<Employee> {
        self.employees.with_items(|employees| {
            resolve_attendees(event, employees)
                .into_iter()
                .cloned()
                .collect()
        })
    }
}

pub struct TeamPage {
    pub employees: EmployeeStore,
}

impl Page for TeamPage {
    fn name(&self) -> &'static str {
        "team"
    }

    fn stores(&self) -> Vec<&dyn LoadableStore> {
        vec![&self.employees as &dyn LoadableStore]
    }
}

impl TeamPage {
    pub fn visible(&self, filter: &TeamFilter) -> Vec<Employee> {
        self.employees.with_items(|employees| {
            filter_employees(employees, filter)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    pub fn departments(&self) -> Vec<String> {
        self.employees.with_items(departments)
    }

    /// Active, away and busy counts over the whole directory.
    pub fn presence(&self) -> PresenceCounts {
        self.employees.with_items(presence_counts)
    }
}

pub struct AnnouncementsPage {
    pub announcements: AnnouncementStore,
}

impl Page for AnnouncementsPage {
    fn name(&self) -> &'static str {
        "announcements"
    }

    fn stores(&self) -> Vec<&dyn LoadableStore> {
        vec![&self.announcements as &dyn LoadableStore]
    }
}

impl AnnouncementsPage {
    pub fn mark_as_read(&self, id: RecordId) -> StoreResult<Announcement> {
        self.announcements.mark_as_read(id)
    }

    pub fn visible(
        &self,
        filter: &AnnouncementFilter,
        sort: AnnouncementSort,
    ) -> Vec<Announcement> {
        self.announcements
            .with_items(|items| visible_announcements(items, filter, sort))
    }

    pub fn counts(&self) -> AnnouncementCounts {
        self.announcements.with_items(announcement_counts)
    }
}
