use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The learning status of a technology.
///
/// - `NotStarted`: on the list, nothing done yet
/// - `InProgress`: currently being studied
/// - `Completed`: learned (can be cycled back to `NotStarted` for re-study)
///
/// The persisted string values are stable and must not change, previously
/// stored lists depend on them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl Status {
    /// All states in declaration order. Tie-breaking in statistics relies on it.
    pub const ALL: [Status; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not-started" => Some(Self::NotStarted),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// The next state in the click-to-advance cycle.
    ///
    /// NotStarted → InProgress → Completed → NotStarted. Explicit status
    /// assignments do not go through here and may jump anywhere.
    pub fn advance(self) -> Self {
        match self {
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::NotStarted,
        }
    }

    /// Progress implied by the status when no explicit value was recorded.
    pub fn default_progress(self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::InProgress => 50,
            Self::Completed => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "unknown status '{}' (expected not-started, in-progress or completed)",
                s
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_cycles_through_all_states() {
        assert_eq!(Status::NotStarted.advance(), Status::InProgress);
        assert_eq!(Status::InProgress.advance(), Status::Completed);
        assert_eq!(Status::Completed.advance(), Status::NotStarted);
    }

    #[test]
    fn serializes_to_stable_literals() {
        let json = serde_json::to_string(&Status::ALL).unwrap();
        assert_eq!(json, r#"["not-started","in-progress","completed"]"#);
    }

    #[test]
    fn rejects_unknown_literal() {
        assert!(serde_json::from_str::<Status>(r#""done""#).is_err());
        assert!("done".parse::<Status>().is_err());
        assert_eq!("in-progress".parse::<Status>(), Ok(Status::InProgress));
    }
}
