//! Data-sync core for the WorkHub employee portal.
//! Adapters, stores and pages over a generic record service.

pub mod adapter;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod page;
pub mod record;
pub mod store;
pub mod view;

pub use adapter::{
    AdapterError, AdapterResult, AnnouncementAdapter, EmployeeAdapter, RecordAdapter,
    RecordMapping, ScheduleEventAdapter, TaskAdapter,
};
pub use config::{BackendConfig, ConfigError, PortalConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogDestination, LoggingError};
pub use model::announcement::{Announcement, AnnouncementPatch, NewAnnouncement};
pub use model::employee::{Employee, EmployeePatch, EmployeeStatus, NewEmployee};
pub use model::event::{NewScheduleEvent, ScheduleEvent, ScheduleEventPatch};
pub use model::task::{NewTask, Priority, Task, TaskPatch, TaskStatus};
pub use model::{RecordId, ValidationError};
pub use notify::{LogNotifier, Notification, Notifier, RecordingNotifier, Severity};
pub use page::{
    AnnouncementsPage, DashboardPage, Page, PageStatus, Portal, SchedulePage, TasksPage, TeamPage,
};
pub use record::{HttpRecordClient, LocalRecordStore, RecordClient, TransportError};
pub use store::{EntityStore, LoadState, LoadableStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
