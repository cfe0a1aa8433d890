use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Completion status shared by the project, phases, milestones, and tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Blocked,
}

impl Status {
    pub fn all() -> &'static [Status] {
        &[
            Status::NotStarted,
            Status::InProgress,
            Status::Completed,
            Status::Blocked,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::NotStarted => "not_started",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
            Status::Blocked => "blocked",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = crate::error::WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(Status::NotStarted),
            "in_progress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            "blocked" => Ok(Status::Blocked),
            _ => Err(crate::error::WardenError::InvalidStatus {
                status: s.to_string(),
                valid: "not_started, in_progress, completed, blocked",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// CriterionStatus
// ---------------------------------------------------------------------------

/// Status for acceptance and success criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    #[default]
    Unmet,
    Met,
}

impl CriterionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CriterionStatus::Unmet => "unmet",
            CriterionStatus::Met => "met",
        }
    }
}

impl fmt::Display for CriterionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CriterionStatus {
    type Err = crate::error::WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "met" => Ok(CriterionStatus::Met),
            "unmet" => Ok(CriterionStatus::Unmet),
            _ => Err(crate::error::WardenError::InvalidStatus {
                status: s.to_string(),
                valid: "met, unmet",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
