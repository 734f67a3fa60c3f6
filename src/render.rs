//! Plain-text rendering for the command line.

use std::collections::BTreeMap;

use crate::models::{Category, Status, Technology};
use crate::views::{CategoryStats, DeadlineStatistics, Statistics};

const NOT_STARTED: char = '○';
const IN_PROGRESS: char = '◐';
const COMPLETED: char = '●';

const BAR_WIDTH: usize = 20;

pub fn status_symbol(status: Status) -> char {
    match status {
        Status::NotStarted => NOT_STARTED,
        Status::InProgress => IN_PROGRESS,
        Status::Completed => COMPLETED,
    }
}

/// A fixed-width bar such as `[#####---------------]`.
pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One line per technology.
///
/// Example output:
/// ```text
/// ● 7  Component Libraries  [####################] 100%  frontend
/// ◐ 3  State Management     [##########----------]  50%  frontend  due 2026-11-01
/// ○ 1  React Components     [--------------------]   0%  frontend
/// ```
pub fn render_list(list: &[Technology]) -> String {
    let id_width = list.iter().map(|t| t.id.to_string().len()).max().unwrap_or(0);
    let title_width = list.iter().map(|t| t.title.chars().count()).max().unwrap_or(0);

    let mut output = String::new();
    for tech in list {
        let progress = tech.progress();
        output.push_str(&format!(
            "{} {:<id_width$}  {:<title_width$}  {} {:>3}%  {}",
            status_symbol(tech.status),
            tech.id.to_string(),
            tech.title,
            progress_bar(progress),
            progress,
            tech.category,
        ));
        if let Some(deadline) = tech.deadline {
            output.push_str(&format!("  due {}", deadline));
        }
        output.push('\n');
    }
    output
}

/// Everything known about a single technology.
pub fn render_detail(tech: &Technology) -> String {
    let mut output = format!(
        "{} {}  (#{})\n{}\n\nStatus:     {}\nProgress:   {} {}%\nCategory:   {}\nPriority:   {}\nDifficulty: {}\n",
        status_symbol(tech.status),
        tech.title,
        tech.id,
        tech.description,
        tech.status.label(),
        progress_bar(tech.progress()),
        tech.progress(),
        tech.category,
        tech.priority.as_str(),
        tech.difficulty.as_str(),
    );
    if let Some(deadline) = tech.deadline {
        output.push_str(&format!("Deadline:   {}\n", deadline));
    }
    if let Some(hours) = tech.estimated_hours {
        output.push_str(&format!("Estimate:   {} h\n", hours));
    }
    output.push_str(&format!(
        "Created:    {}\nUpdated:    {}\n",
        tech.created_at.format("%Y-%m-%d %H:%M"),
        tech.updated_at.format("%Y-%m-%d %H:%M"),
    ));
    if !tech.notes.is_empty() {
        output.push_str(&format!("\nNotes:\n{}\n", tech.notes));
    }
    output
}

pub fn render_statistics(
    stats: &Statistics,
    categories: &BTreeMap<Category, CategoryStats>,
    most_common: Status,
    deadlines: &DeadlineStatistics,
) -> String {
    let mut output = format!(
        "Overall {} {}%\n\n{} Completed    {}\n{} In progress  {}\n{} Not started  {}\n  Total        {}\n\nAverage progress: {}%\nMost common:      {}\n",
        progress_bar(stats.percent_complete),
        stats.percent_complete,
        COMPLETED,
        stats.completed_count,
        IN_PROGRESS,
        stats.in_progress_count,
        NOT_STARTED,
        stats.not_started_count,
        stats.total,
        stats.average_progress,
        most_common.label(),
    );

    if !categories.is_empty() {
        output.push_str("\nBy category:\n");
        for (category, counts) in categories {
            output.push_str(&format!(
                "  {:<9} {}/{}\n",
                category.as_str(),
                counts.completed,
                counts.total
            ));
        }
    }

    output.push_str(&format!(
        "\nDeadlines: {} set ({}%), {} overdue, {} due this week\n",
        deadlines.with_deadlines, deadlines.deadline_percentage, deadlines.overdue, deadlines.upcoming,
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_technologies, TechnologyId};
    use crate::views::statistics;

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0), "[--------------------]");
        assert_eq!(progress_bar(50), "[##########----------]");
        assert_eq!(progress_bar(100), "[####################]");
        assert_eq!(progress_bar(250), "[####################]");
    }

    #[test]
    fn test_list_lines() {
        let list: Vec<_> = default_technologies()
            .into_iter()
            .filter(|t| t.id == TechnologyId::Numeric(3) || t.id == TechnologyId::Numeric(7))
            .collect();
        let output = render_list(&list);
        let expected = "◐ 3  State Management     [##########----------]  50%  frontend\n\
                        ● 7  Component Libraries  [####################] 100%  frontend\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(render_list(&[]), "");
    }

    #[test]
    fn test_statistics_headline() {
        let list = default_technologies();
        let stats = statistics(&list);
        let output = render_statistics(
            &stats,
            &BTreeMap::new(),
            Status::NotStarted,
            &DeadlineStatistics::default(),
        );
        assert!(output.starts_with("Overall [##------------------] 13%\n"));
        assert!(output.contains("Most common:      Not started\n"));
        assert!(!output.contains("By category"));
    }
}
