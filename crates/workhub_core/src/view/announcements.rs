//! Announcement feed filters, counts and sort orders.

use super::compare_text;
use crate::model::announcement::Announcement;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnnouncementFilter {
    #[default]
    All,
    Unread,
    Read,
    Category(String),
}

impl AnnouncementFilter {
    /// Any name other than `all`, `unread` or `read` selects a category.
    pub fn parse(value: &str) -> Self {
        match value {
            "all" | "" => Self::All,
            "unread" => Self::Unread,
            "read" => Self::Read,
            category => Self::Category(category.to_string()),
        }
    }

    pub fn matches(&self, announcement: &Announcement) -> bool {
        match self {
            Self::All => true,
            Self::Unread => !announcement.is_read,
            Self::Read => announcement.is_read,
            Self::Category(category) => announcement.category == *category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnouncementSort {
    /// Newest first.
    #[default]
    Date,
    Category,
    Title,
}

impl AnnouncementSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date" => Some(Self::Date),
            "category" => Some(Self::Category),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnouncementCounts {
    pub all: usize,
    pub unread: usize,
    pub read: usize,
    /// One entry per category, in the order of [`categories`].
    pub by_category: Vec<(String, usize)>,
}

/// Distinct non-empty categories in first-seen order.
pub fn categories(announcements: &[Announcement]) -> Vec<String> {
    let mut seen = HashSet::new();
    announcements
        .iter()
        .map(|announcement| announcement.category.as_str())
        .filter(|category| !category.is_empty() && seen.insert(*category))
        .map(str::to_string)
        .collect()
}

pub fn announcement_counts(announcements: &[Announcement]) -> AnnouncementCounts {
    let unread = announcements.iter().filter(|a| !a.is_read).count();
    let by_category = categories(announcements)
        .into_iter()
        .map(|category| {
            let count = announcements
                .iter()
                .filter(|a| a.category == category)
                .count();
            (category, count)
        })
        .collect();
    AnnouncementCounts {
        all: announcements.len(),
        unread,
        read: announcements.len() - unread,
        by_category,
    }
}

pub fn visible_announcements(
    announcements: &[Announcement],
    filter: &AnnouncementFilter,
    sort: AnnouncementSort,
) -> Vec<Announcement> {
    let mut visible: Vec<Announcement> = announcements
        .iter()
        .filter(|announcement| filter.matches(announcement))
        .cloned()
        .collect();
    match sort {
        AnnouncementSort::Date => visible.sort_by(|a, b| b.date.cmp(&a.date)),
        AnnouncementSort::Category => visible.sort_by(|a, b| compare_text(&a.category, &b.category)),
        AnnouncementSort::Title => visible.sort_by(|a, b| compare_text(&a.title, &b.title)),
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::{announcement_counts, visible_announcements, AnnouncementFilter, AnnouncementSort};
    use crate::model::announcement::Announcement;
    use chrono::{Duration, TimeZone, Utc};

    fn feed() -> Vec<Announcement> {
        let base = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        [
            (1, "Benefits", "hr", false, 0),
            (2, "All hands", "company", true, 2),
            (3, "Parking", "facilities", false, 1),
            (4, "Open enrollment", "hr", true, 3),
        ]
        .into_iter()
        .map(|(id, title, category, is_read, days)| Announcement {
            id,
            title: title.to_string(),
            content: String::new(),
            author: "ops".to_string(),
            date: base + Duration::days(days),
            category: category.to_string(),
            is_read,
        })
        .collect()
    }

    #[test]
    fn counts_split_read_state_and_categories() {
        let counts = announcement_counts(&feed());
        assert_eq!((counts.all, counts.unread, counts.read), (4, 2, 2));
        assert_eq!(
            counts.by_category,
            vec![
                ("hr".to_string(), 2),
                ("company".to_string(), 1),
                ("facilities".to_string(), 1)
            ]
        );
    }

    #[test]
    fn default_view_is_newest_first() {
        let ids: Vec<_> = visible_announcements(&feed(), &AnnouncementFilter::All, AnnouncementSort::Date)
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn category_filter_comes_from_any_other_name() {
        let filter = AnnouncementFilter::parse("hr");
        assert_eq!(filter, AnnouncementFilter::Category("hr".to_string()));
        let titles: Vec<_> = visible_announcements(&feed(), &filter, AnnouncementSort::Title)
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["Benefits", "Open enrollment"]);
        assert_eq!(
            visible_announcements(&feed(), &AnnouncementFilter::Unread, AnnouncementSort::Date).len(),
            2
        );
    }
}
