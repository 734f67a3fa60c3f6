//! The downloadable JSON snapshot of the technology list.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Technology};
use crate::views::{category_statistics, statistics, CategoryStats, Statistics};

/// Full list plus the aggregate numbers shown alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub technologies: Vec<Technology>,
    pub exported_at: DateTime<Utc>,
    pub summary: ExportSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    #[serde(flatten)]
    pub statistics: Statistics,
    pub categories: BTreeMap<Category, CategoryStats>,
}

impl ExportDocument {
    pub fn new(technologies: Vec<Technology>, exported_at: DateTime<Utc>) -> Self {
        let summary = ExportSummary {
            statistics: statistics(&technologies),
            categories: category_statistics(&technologies),
        };
        Self {
            technologies,
            exported_at,
            summary,
        }
    }

    /// Suggested download name, e.g. `technologies_2026-10-19.json`.
    pub fn file_name(&self) -> String {
        format!("technologies_{}.json", self.exported_at.format("%Y-%m-%d"))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_technologies;
    use chrono::TimeZone;

    #[test]
    fn summary_is_flattened_next_to_categories() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let doc = ExportDocument::new(default_technologies(), now);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["exportedAt"], "2026-10-19T12:00:00Z");
        assert_eq!(value["technologies"].as_array().unwrap().len(), 8);
        assert_eq!(value["summary"]["total"], 8);
        assert_eq!(value["summary"]["completedCount"], 1);
        assert_eq!(value["summary"]["percentComplete"], 13);
        assert_eq!(value["summary"]["categories"]["frontend"]["total"], 6);
        assert_eq!(value["summary"]["categories"]["testing"]["completed"], 0);
        assert_eq!(doc.file_name(), "technologies_2026-10-19.json");
    }

    #[test]
    fn reads_back_what_it_writes() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let doc = ExportDocument::new(default_technologies(), now);
        let json = doc.to_json_pretty().unwrap();
        let back: ExportDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
