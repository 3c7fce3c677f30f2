//! Team directory search and filters.

use crate::model::employee::{Employee, EmployeeStatus};
use std::collections::HashSet;

/// Current directory selection. Empty search and `None` filters match all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamFilter {
    pub search: String,
    pub department: Option<String>,
    pub status: Option<EmployeeStatus>,
}

impl TeamFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        self.matches_search(employee)
            && self
                .department
                .as_deref()
                .map_or(true, |department| employee.department == department)
            && self.status.map_or(true, |status| employee.status == status)
    }

    fn matches_search(&self, employee: &Employee) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&employee.name, &employee.role, &employee.email]
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

pub fn filter_employees<'a>(employees: &'a [Employee], filter: &TeamFilter) -> Vec<&'a Employee> {
    employees
        .iter()
        .filter(|employee| filter.matches(employee))
        .collect()
}

/// Distinct non-empty departments in first-seen order.
pub fn departments(employees: &[Employee]) -> Vec<String> {
    let mut seen = HashSet::new();
    employees
        .iter()
        .map(|employee| employee.department.as_str())
        .filter(|department| !department.is_empty() && seen.insert(*department))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresenceCounts {
    pub active: usize,
    pub away: usize,
    pub busy: usize,
}

pub fn presence_counts(employees: &[Employee]) -> PresenceCounts {
    employees
        .iter()
        .fold(PresenceCounts::default(), |mut counts, employee| {
            match employee.status {
                EmployeeStatus::Active => counts.active += 1,
                EmployeeStatus::Away => counts.away += 1,
                EmployeeStatus::Busy => counts.busy += 1,
            }
            counts
        })
}
