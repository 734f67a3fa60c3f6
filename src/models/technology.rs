use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::status::Status;
use super::timestamp;

/// Identifier of a technology record.
///
/// Stored lists contain both numeric ids (`1`, `2`, …) and string ids
/// (`"1700000000000"`), so both forms are accepted and written back unchanged.
/// `1` and `"1"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TechnologyId {
    Numeric(u64),
    Text(String),
}

impl TechnologyId {
    /// Numeric value of the id, if it has one. Used to allocate fresh ids.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Text(s) => s.parse().ok(),
        }
    }

    /// True when both ids read the same as text, whatever their kind.
    pub fn same_text(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for TechnologyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for TechnologyId {
    fn from(n: u64) -> Self {
        Self::Numeric(n)
    }
}

impl From<&str> for TechnologyId {
    fn from(s: &str) -> Self {
        s.parse::<u64>()
            .map(Self::Numeric)
            .unwrap_or_else(|_| Self::Text(s.to_string()))
    }
}

impl FromStr for TechnologyId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Subject area of a technology. Unknown tags in stored data read as `Other`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Frontend,
    Backend,
    Database,
    Devops,
    Mobile,
    Testing,
    Tools,
    Ai,
    Cloud,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Self::Frontend,
        Self::Backend,
        Self::Database,
        Self::Devops,
        Self::Mobile,
        Self::Testing,
        Self::Tools,
        Self::Ai,
        Self::Cloud,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Database => "database",
            Self::Devops => "devops",
            Self::Mobile => "mobile",
            Self::Testing => "testing",
            Self::Tools => "tools",
            Self::Ai => "ai",
            Self::Cloud => "cloud",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(&s.to_lowercase()).ok_or_else(|| format!("unknown category '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("unknown priority '{}'", s)),
        }
    }
}

/// How hard a technology is expected to be.
///
/// Some stored lists use `intermediate`, which reads as `Medium`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    #[serde(alias = "intermediate")]
    Medium,
    Advanced,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Medium => "medium",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "medium" | "intermediate" => Ok(Self::Medium),
            "advanced" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            _ => Err(format!("unknown difficulty '{}'", s)),
        }
    }
}

/// A technology on the learning list.
///
/// Records are stored as camelCase JSON objects. Fields missing from older
/// stored lists take their defaults, and keys this type does not know about
/// are kept in `extra` so they survive a load/save cycle.
///
/// # Progress
/// `progress` holds an explicit override. When absent, [`Technology::progress`]
/// derives the value from the status. Changing the status drops the override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    pub id: TechnologyId,
    pub title: String,
    pub description: String,
    pub status: Status,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, deserialize_with = "timestamp::deserialize_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_hours: Option<u32>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Technology {
    /// Progress in percent: the explicit override, or the status default.
    pub fn progress(&self) -> u8 {
        self.progress
            .map(|p| p.min(100))
            .unwrap_or_else(|| self.status.default_progress())
    }

    /// Assign a status directly (no cycle), dropping any progress override.
    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        self.progress = None;
        self.updated_at = now;
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != Status::Completed && self.deadline.is_some_and(|d| d < today)
    }
}

/// Input for adding a technology.
///
/// `title` and `description` are required; everything else falls back to the
/// defaults of [`Technology`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTechnology {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    /// Signed so that zero and negative input can be reported instead of rejected by the parser.
    #[serde(default)]
    pub estimated_hours: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTechnology {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// Input for editing a technology. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub difficulty: Option<Difficulty>,
    pub estimated_hours: Option<i64>,
}

impl TechnologyUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.difficulty.is_none()
            && self.estimated_hours.is_none()
    }
}
