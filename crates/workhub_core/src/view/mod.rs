//! Presentational derivations over store snapshots.
//!
//! Everything here is a pure function of a borrowed list plus the current
//! selection; nothing writes back into a store. Pages recompute these on
//! every render.

pub mod announcements;
pub mod calendar;
pub mod dashboard;
pub mod tasks;
pub mod team;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::cmp::Ordering;

/// Calendar date of `instant` as seen in `tz`.
pub(crate) fn local_date<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Case-insensitive text order with a byte-order tie-break, close to what a
/// locale-aware compare gives for plain titles.
pub(crate) fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

#[cfg(test)]
mod tests {
    use super::compare_text;
    use std::cmp::Ordering;

    #[test]
    fn text_order_ignores_case_first() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("Apple", "apple"), Ordering::Less);
    }
}
