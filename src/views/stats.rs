use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Status, Technology};

/// Counts per status over a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: usize,
    pub completed_count: usize,
    pub in_progress_count: usize,
    pub not_started_count: usize,
    /// Share of completed records, rounded, 0 for an empty list.
    pub percent_complete: u8,
    /// Mean of [`Technology::progress`], rounded, 0 for an empty list.
    pub average_progress: u8,
}

impl Statistics {
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::NotStarted => self.not_started_count,
            Status::InProgress => self.in_progress_count,
            Status::Completed => self.completed_count,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: usize,
    pub completed: usize,
}

/// How deadlines are spread over the list, relative to `today`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineStatistics {
    pub total: usize,
    pub with_deadlines: usize,
    pub without_deadlines: usize,
    /// Deadline before today and not completed.
    pub overdue: usize,
    /// Deadline within the coming week and not completed.
    pub upcoming: usize,
    pub deadline_percentage: u8,
}

/// `round(part / total * 100)`, or 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

pub fn statistics(list: &[Technology]) -> Statistics {
    let mut stats = Statistics {
        total: list.len(),
        ..Default::default()
    };
    let mut progress_sum: u64 = 0;

    for tech in list {
        match tech.status {
            Status::NotStarted => stats.not_started_count += 1,
            Status::InProgress => stats.in_progress_count += 1,
            Status::Completed => stats.completed_count += 1,
        }
        progress_sum += u64::from(tech.progress());
    }

    stats.percent_complete = percentage(stats.completed_count, stats.total);
    if stats.total > 0 {
        stats.average_progress = (progress_sum as f64 / stats.total as f64).round() as u8;
    }
    stats
}

pub fn category_statistics(list: &[Technology]) -> BTreeMap<Category, CategoryStats> {
    let mut categories: BTreeMap<Category, CategoryStats> = BTreeMap::new();
    for tech in list {
        let entry = categories.entry(tech.category).or_default();
        entry.total += 1;
        if tech.status == Status::Completed {
            entry.completed += 1;
        }
    }
    categories
}

/// The status held by most records. Ties go to the earliest state in
/// declaration order, so an empty list yields `NotStarted`.
pub fn most_common_status(list: &[Technology]) -> Status {
    let stats = statistics(list);
    let mut best = Status::NotStarted;
    for status in Status::ALL {
        if stats.count(status) > stats.count(best) {
            best = status;
        }
    }
    best
}

pub fn deadline_statistics(list: &[Technology], today: NaiveDate) -> DeadlineStatistics {
    let week_out = today.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX);
    let mut stats = DeadlineStatistics {
        total: list.len(),
        ..Default::default()
    };

    for tech in list {
        let Some(deadline) = tech.deadline else {
            continue;
        };
        stats.with_deadlines += 1;
        if tech.status == Status::Completed {
            continue;
        }
        if deadline < today {
            stats.overdue += 1;
        } else if deadline > today && deadline <= week_out {
            stats.upcoming += 1;
        }
    }

    stats.without_deadlines = stats.total - stats.with_deadlines;
    stats.deadline_percentage = percentage(stats.with_deadlines, stats.total);
    stats
}
