//! The fixed development workflow and its transition rules.
//!
//! Work on a milestone moves through five phases in order. A session may
//! stay in a phase or advance to the next one; going backwards or skipping
//! ahead is rejected with a reason the hook layer can surface verbatim.

use crate::error::{Result, WardenError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Explore,
    Research,
    Plan,
    Code,
    Commit,
}

impl WorkflowPhase {
    pub fn all() -> &'static [WorkflowPhase] {
        &[
            WorkflowPhase::Explore,
            WorkflowPhase::Research,
            WorkflowPhase::Plan,
            WorkflowPhase::Code,
            WorkflowPhase::Commit,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowPhase::Explore => "explore",
            WorkflowPhase::Research => "research",
            WorkflowPhase::Plan => "plan",
            WorkflowPhase::Code => "code",
            WorkflowPhase::Commit => "commit",
        }
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Option<WorkflowPhase> {
        Self::all().get(self.index() + 1).copied()
    }

    /// The subagents allowed to run while this phase is active.
    pub fn allowed_subagents(&self) -> &'static [&'static str] {
        match self {
            WorkflowPhase::Explore => &["codebase-explorer"],
            WorkflowPhase::Research => &["research-specialist", "research-consultant"],
            WorkflowPhase::Plan => &["planning-specialist", "plan-consultant"],
            WorkflowPhase::Code => CODE_SEQUENCE,
            WorkflowPhase::Commit => &["version-manager"],
        }
    }
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowPhase {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "explore" => Ok(WorkflowPhase::Explore),
            "research" => Ok(WorkflowPhase::Research),
            "plan" => Ok(WorkflowPhase::Plan),
            "code" => Ok(WorkflowPhase::Code),
            "commit" => Ok(WorkflowPhase::Commit),
            _ => Err(WardenError::UnknownPhase(s.to_string())),
        }
    }
}

/// Subagents of the code phase, in the order they must run. A retry of the
/// subagent that just ran is always allowed.
pub const CODE_SEQUENCE: &[&str] = &[
    "test-engineer",
    "fullstack-developer",
    "code-reviewer",
    "version-manager",
];

// ---------------------------------------------------------------------------

/// Check a phase transition. `current` of None means no phase is active yet,
/// in which case any starting phase is allowed.
pub fn validate_transition(current: Option<WorkflowPhase>, next: WorkflowPhase) -> Result<()> {
    let Some(current) = current else {
        return Ok(());
    };
    if next == current || Some(next) == current.next() {
        return Ok(());
    }
    if next.index() < current.index() {
        return Err(WardenError::InvalidTransition {
            from: current.to_string(),
            to: next.to_string(),
            reason: "cannot go back to an earlier phase".to_string(),
        });
    }
    let skipped: Vec<&str> = WorkflowPhase::all()[current.index() + 1..next.index()]
        .iter()
        .map(|p| p.as_str())
        .collect();
    Err(WardenError::InvalidTransition {
        from: current.to_string(),
        to: next.to_string(),
        reason: format!("would skip: {}", skipped.join(", ")),
    })
}

/// Check a code-phase subagent against the ordered sequence. `position` is
/// the index of the next expected subagent; on success returns the position
/// after this run.
pub fn validate_code_subagent(position: usize, subagent: &str) -> Result<usize> {
    let expected = CODE_SEQUENCE.get(position).copied();
    if Some(subagent) == expected {
        return Ok(position + 1);
    }
    // Re-running the previous subagent keeps the cursor in place.
    if position > 0 && CODE_SEQUENCE.get(position - 1).copied() == Some(subagent) {
        return Ok(position);
    }
    Err(WardenError::InvalidTransition {
        from: position
            .checked_sub(1)
            .and_then(|i| CODE_SEQUENCE.get(i))
            .copied()
            .unwrap_or("start")
            .to_string(),
        to: subagent.to_string(),
        reason: match expected {
            Some(name) => format!(
                "expected {} (step {} of {}) next in the code sequence",
                name,
                position + 1,
                CODE_SEQUENCE.len()
            ),
            None => "the code sequence is already complete".to_string(),
        },
    })
}
