//! Read-only projections of the technology list.
//!
//! Everything here is a pure function of the list passed in. Results are
//! recomputed on every call and never persisted. Filters keep the original
//! list order.

mod stats;

pub use stats::*;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::{Category, Status, Technology};

/// Status selection for list views. `All` keeps every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(&self, tech: &Technology) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => tech.status == *status,
        }
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        Self::Only(status)
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, tech: &Technology) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => tech.category == *category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Keep list order.
    #[default]
    None,
    /// Alphabetical, ignoring case.
    Title,
    /// Most progressed first.
    Progress,
    /// Earliest deadline first; records without a deadline last.
    Deadline,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "title" => Ok(Self::Title),
            "progress" => Ok(Self::Progress),
            "deadline" => Ok(Self::Deadline),
            _ => Err(format!(
                "unknown sort key '{}' (expected none, title, progress or deadline)",
                s
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Title => "title",
            Self::Progress => "progress",
            Self::Deadline => "deadline",
        })
    }
}

pub fn filter_by_status(list: &[Technology], status: StatusFilter) -> Vec<Technology> {
    list.iter().filter(|t| status.matches(t)).cloned().collect()
}

/// Case-insensitive substring match on title, description and notes.
/// A blank query matches everything.
pub fn filter_by_search(list: &[Technology], query: &str) -> Vec<Technology> {
    list.iter()
        .filter(|t| matches_search(t, query))
        .cloned()
        .collect()
}

pub fn filter_by_category(list: &[Technology], category: CategoryFilter) -> Vec<Technology> {
    list.iter().filter(|t| category.matches(t)).cloned().collect()
}

/// Status filter AND search filter.
pub fn combined_filter(list: &[Technology], status: StatusFilter, query: &str) -> Vec<Technology> {
    list.iter()
        .filter(|t| status.matches(t) && matches_search(t, query))
        .cloned()
        .collect()
}

pub fn matches_search(tech: &Technology, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [&tech.title, &tech.description, &tech.notes]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// A list view: filters, then an ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub status: StatusFilter,
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: impl Into<StatusFilter>) -> Self {
        self.status = status.into();
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = CategoryFilter::Only(category);
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn apply(&self, list: &[Technology]) -> Vec<Technology> {
        let mut result: Vec<Technology> = list
            .iter()
            .filter(|t| {
                self.status.matches(t)
                    && self.category.matches(t)
                    && matches_search(t, &self.search)
            })
            .cloned()
            .collect();
        sort_technologies(&mut result, self.sort);
        result
    }
}

/// Stable sort by `key`.
pub fn sort_technologies(list: &mut [Technology], key: SortKey) {
    match key {
        SortKey::None => {}
        SortKey::Title => list.sort_by_cached_key(|t| t.title.to_lowercase()),
        SortKey::Progress => list.sort_by(|a, b| b.progress().cmp(&a.progress())),
        SortKey::Deadline => list.sort_by(|a, b| match (a.deadline, b.deadline) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
    }
}
