//! Week grid for the schedule page.
//!
//! Weeks start on Monday. Day membership is decided in the viewer's time
//! zone, so the same event can land on different days for different
//! viewers.

use super::local_date;
use crate::model::event::ScheduleEvent;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

/// The week currently shown; navigation returns a new cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCursor {
    start: NaiveDate,
}

impl WeekCursor {
    pub fn containing(date: NaiveDate) -> Self {
        let offset = i64::from(date.weekday().num_days_from_monday());
        Self {
            start: date - Duration::days(offset),
        }
    }

    pub fn today<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self::containing(now.date_naive())
    }

    /// Monday.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Sunday.
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        (0..7).map(|offset| self.start + Duration::days(offset)).collect()
    }

    pub fn previous(&self) -> Self {
        Self {
            start: self.start - Duration::days(7),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            start: self.start + Duration::days(7),
        }
    }

    /// Jumps `weeks` forward (negative goes back); `None` past the
    /// representable date range.
    pub fn shifted(&self, weeks: i64) -> Option<Self> {
        Duration::try_weeks(weeks)
            .and_then(|delta| self.start.checked_add_signed(delta))
            .map(|start| Self { start })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub events: Vec<ScheduleEvent>,
}

/// Events starting on `day` in `tz`, in list order.
pub fn events_on<'a, Tz: TimeZone>(
    events: &'a [ScheduleEvent],
    day: NaiveDate,
    tz: &Tz,
) -> Vec<&'a ScheduleEvent> {
    events
        .iter()
        .filter(|event| local_date(event.start_time, tz) == day)
        .collect()
}

pub fn week_grid<Tz: TimeZone>(
    events: &[ScheduleEvent],
    week: WeekCursor,
    now: &DateTime<Tz>,
) -> Vec<CalendarDay> {
    let tz = now.timezone();
    let today = now.date_naive();
    week.days()
        .into_iter()
        .map(|date| CalendarDay {
            date,
            is_today: date == today,
            events: events_on(events, date, &tz).into_iter().cloned().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{week_grid, WeekCursor};
    use crate::model::event::ScheduleEvent;
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc, Weekday, Datelike};

    fn event(id: i64, start: chrono::DateTime<Utc>) -> ScheduleEvent {
        ScheduleEvent {
            id,
            title: format!("event {id}"),
            kind: "meeting".to_string(),
            start_time: start,
            end_time: start + Duration::minutes(30),
            location: String::new(),
            attendees: Vec::new(),
        }
    }

    #[test]
    fn weeks_start_on_monday_and_navigate() {
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        let week = WeekCursor::containing(sunday);
        assert_eq!(week.start().weekday(), Weekday::Mon);
        assert_eq!(week.start(), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(week.end(), sunday);
        assert_eq!(week.next().previous(), week);
        assert!(!week.next().contains(sunday));
        assert_eq!(week.days().len(), 7);
    }

    #[test]
    fn shifting_matches_stepping_and_stops_at_range_end() {
        let week = WeekCursor::containing(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        assert_eq!(week.shifted(2), Some(week.next().next()));
        assert_eq!(week.shifted(-1), Some(week.previous()));
        assert_eq!(week.shifted(0), Some(week));
        assert_eq!(week.shifted(i64::from(i32::MIN)), None);
        assert_eq!(week.shifted(i64::MAX), None);
    }

    #[test]
    fn grid_places_events_by_local_day() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 6, 5, 10, 0, 0).unwrap();
        // 23:30 UTC on Tuesday is already Wednesday at +02:00.
        let late = Utc.with_ymd_and_hms(2024, 6, 4, 23, 30, 0).unwrap();
        let events = vec![event(1, late), event(2, late - Duration::days(1))];

        let grid = week_grid(&events, WeekCursor::today(&now), &now);
        let wednesday = &grid[2];
        assert!(wednesday.is_today);
        assert_eq!(wednesday.events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(grid[1].events[0].id, 2);
    }
}
