//! `workhub` operator CLI.
//!
//! # Responsibility
//! - Open a portal from config and environment, then drive one page per
//!   subcommand.
//! - Print views on stdout and notifications on stderr.

mod seed;

use anyhow::{bail, Context};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use workhub_core::page::PageStatus;
use workhub_core::view::announcements::{AnnouncementFilter, AnnouncementSort};
use workhub_core::view::calendar::WeekCursor;
use workhub_core::view::dashboard::resolve_attendees;
use workhub_core::view::tasks::{TaskFilter, TaskSort};
use workhub_core::view::team::TeamFilter;
use workhub_core::{
    init_logging, EmployeeStatus, LogNotifier, Notifier, Page, PortalConfig, Portal, RecordId,
    Severity, TaskStatus,
};

#[derive(Parser)]
#[command(name = "workhub")]
#[command(about = "Employee portal data tools", version)]
struct Cli {
    /// JSON config file; WORKHUB_* environment variables override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level override (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check core linkage
    Ping,
    /// Insert demo employees, tasks, events and announcements
    Seed,
    /// Today's progress, events and news
    Dashboard,
    /// List tasks
    Tasks {
        /// all|pending|completed|high|overdue
        #[arg(long, default_value = "all")]
        filter: String,
        /// due-date|priority|status|title
        #[arg(long, default_value = "due-date")]
        sort: String,
    },
    /// Week view of the schedule
    Schedule {
        /// Weeks from the current one; negative goes back
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },
    /// Search the team directory
    Team {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        department: Option<String>,
        /// active|away|busy
        #[arg(long)]
        status: Option<String>,
    },
    /// List announcements
    Announcements {
        /// all|unread|read|<category>
        #[arg(long, default_value = "all")]
        filter: String,
        /// date|category|title
        #[arg(long, default_value = "date")]
        sort: String,
    },
    /// Mark one announcement as read
    MarkRead { id: RecordId },
    /// Mark one task completed
    CompleteTask { id: RecordId },
    /// Delete one task
    DeleteTask { id: RecordId },
}

/// Prints notifications to stderr and keeps a copy in the log.
struct ConsoleNotifier {
    log: LogNotifier,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.log.notify(severity, message);
        match severity {
            Severity::Success => eprintln!("[ok] {message}"),
            Severity::Error => eprintln!("[error] {message}"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = PortalConfig::load(cli.config.as_deref()).context("loading config")?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    init_logging(&config.log_level, config.log_dir.as_deref()).context("starting logging")?;

    if let Command::Ping = cli.command {
        println!("workhub_core ping={}", workhub_core::ping());
        println!("workhub_core version={}", workhub_core::core_version());
        return Ok(());
    }

    let portal = Portal::from_config(&config, Arc::new(ConsoleNotifier { log: LogNotifier }))
        .context("opening record backend")?;

    match cli.command {
        Command::Ping => Ok(()),
        Command::Seed => seed::run(&portal),
        Command::Dashboard => dashboard(&portal),
        Command::Tasks { filter, sort } => tasks(&portal, &filter, &sort),
        Command::Schedule { offset } => schedule(&portal, offset),
        Command::Team {
            search,
            department,
            status,
        } => team(&portal, search, department, status.as_deref()),
        Command::Announcements { filter, sort } => announcements(&portal, &filter, &sort),
        Command::MarkRead { id } => {
            let page = portal.announcements_page();
            mounted(&page)?;
            let announcement = page.mark_as_read(id)?;
            println!("#{} {} is read", announcement.id, announcement.title);
            Ok(())
        }
        Command::CompleteTask { id } => {
            let page = portal.tasks_page();
            mounted(&page)?;
            let task = page.change_status(id, TaskStatus::Completed)?;
            println!("#{} {} -> {}", task.id, task.title, task.status.as_str());
            Ok(())
        }
        Command::DeleteTask { id } => {
            let page = portal.tasks_page();
            mounted(&page)?;
            page.delete_task(id)?;
            println!("#{id} deleted");
            Ok(())
        }
    }
}

/// Mounts `page` and fails on a combined load error.
fn mounted(page: &impl Page) -> anyhow::Result<()> {
    let outcome = page.mount();
    if let PageStatus::Failed(message) = page.status() {
        bail!("{} page failed to load: {message}", page.name());
    }
    outcome?;
    Ok(())
}

fn dashboard(portal: &Portal) -> anyhow::Result<()> {
    let page = portal.dashboard();
    mounted(&page)?;
    let now = Local::now();
    let summary = page.summary(&now);

    println!(
        "Today's progress: {}/{} tasks completed ({:.0}%)",
        summary.today_completed, summary.today_total, summary.completion_rate
    );
    if summary.overdue > 0 {
        println!("Overdue tasks: {}", summary.overdue);
    }
    println!("Total tasks: {}", summary.total_tasks);
    println!("Events today: {}", summary.events_today);
    println!("Unread announcements: {}", summary.unread_announcements);

    println!("\nUpcoming events:");
    for event in &summary.upcoming_events {
        let attendees: Vec<String> = page.employees.with_items(|employees| {
            resolve_attendees(event, employees)
                .into_iter()
                .map(|employee| employee.name.clone())
                .collect()
        });
        println!(
            "  {} {} @ {} [{}]",
            event.start_time.with_timezone(&Local).format("%a %H:%M"),
            event.title,
            event.location,
            attendees.join(", ")
        );
    }

    println!("\nRecent announcements:");
    for announcement in &summary.recent_announcements {
        println!(
            "  {} {}{}",
            announcement.date.with_timezone(&Local).format("%Y-%m-%d"),
            announcement.title,
            if announcement.is_read { "" } else { " (new)" }
        );
    }
    Ok(())
}

fn tasks(portal: &Portal, filter: &str, sort: &str) -> anyhow::Result<()> {
    let filter = TaskFilter::parse(filter)
        .with_context(|| format!("unknown task filter `{filter}`"))?;
    let sort = TaskSort::parse(sort).with_context(|| format!("unknown task sort `{sort}`"))?;

    let page = portal.tasks_page();
    mounted(&page)?;
    let now = Utc::now();
    let counts = page.counts(now);
    let tabs: Vec<String> = TaskFilter::ALL
        .iter()
        .map(|tab| format!("{tab}={}", counts.get(*tab)))
        .collect();
    println!("{}", tabs.join(" "));

    for task in page.visible(filter, sort, now) {
        let due = task
            .due_date
            .map(|due| due.with_timezone(&Local).format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "#{:<4} {:<11} {:<6} {:<10} {}{}",
            task.id,
            task.status.as_str(),
            task.priority.as_str(),
            due,
            task.title,
            if task.is_overdue(now) { " (overdue)" } else { "" }
        );
    }
    Ok(())
}

fn schedule(portal: &Portal, offset: i32) -> anyhow::Result<()> {
    let page = portal.schedule();
    mounted(&page)?;
    let now = Local::now();
    let week = WeekCursor::today(&now)
        .shifted(i64::from(offset))
        .with_context(|| format!("week offset {offset} is out of range"))?;

    println!("Week of {} to {}", week.start(), week.end());
    for day in page.week(week, &now) {
        let marker = if day.is_today { "*" } else { " " };
        println!("{marker}{}", day.date.format("%a %Y-%m-%d"));
        for event in &day.events {
            let end = event.end_time.with_timezone(&Local);
            println!(
                "    {}-{} {} ({}) {} attendees",
                event.start_time.with_timezone(&Local).format("%H:%M"),
                end.format("%H:%M"),
                event.title,
                event.kind,
                page.attendees(event).len()
            );
        }
    }
    Ok(())
}

fn team(
    portal: &Portal,
    search: String,
    department: Option<String>,
    status: Option<&str>,
) -> anyhow::Result<()> {
    let status = status
        .map(|value| {
            EmployeeStatus::parse(value).with_context(|| format!("unknown status `{value}`"))
        })
        .transpose()?;
    let filter = TeamFilter {
        search,
        department,
        status,
    };

    let page = portal.team();
    mounted(&page)?;
    let visible = page.visible(&filter);
    println!(
        "Showing {} of {} employees; departments: {}",
        visible.len(),
        page.employees.len(),
        page.departments().join(", ")
    );
    let presence = page.presence();
    println!(
        "active={} away={} busy={}",
        presence.active, presence.away, presence.busy
    );
    for employee in visible {
        println!(
            "#{:<4} {:<20} {:<24} {:<14} {:<7} {}",
            employee.id,
            employee.name,
            employee.role,
            employee.department,
            employee.status.as_str(),
            employee.email
        );
    }
    Ok(())
}

fn announcements(portal: &Portal, filter: &str, sort: &str) -> anyhow::Result<()> {
    let filter = AnnouncementFilter::parse(filter);
    let sort = AnnouncementSort::parse(sort)
        .with_context(|| format!("unknown announcement sort `{sort}`"))?;

    let page = portal.announcements_page();
    mounted(&page)?;
    let counts = page.counts();
    let categories: Vec<String> = counts
        .by_category
        .iter()
        .map(|(category, count)| format!("{category}={count}"))
        .collect();
    println!(
        "all={} unread={} read={} {}",
        counts.all,
        counts.unread,
        counts.read,
        categories.join(" ")
    );
    for announcement in page.visible(&filter, sort) {
        println!(
            "#{:<4} {} [{}] {} by {}{}",
            announcement.id,
            announcement.date.with_timezone(&Local).format("%Y-%m-%d"),
            announcement.category,
            announcement.title,
            announcement.author,
            if announcement.is_read { "" } else { " (unread)" }
        );
    }
    Ok(())
}
