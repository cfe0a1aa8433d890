use crate::error::{Result, WardenError};
use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// ID patterns
// ---------------------------------------------------------------------------

macro_rules! id_regex {
    ($fn_name:ident, $pattern:expr) => {
        fn $fn_name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).unwrap())
        }
    };
}

id_regex!(phase_re, r"^PHASE-\d{3}$");
id_regex!(milestone_re, r"^MS-\d{3}$");
id_regex!(task_re, r"^T\d{3}$");
id_regex!(ac_re, r"^AC-\d{3}$");
id_regex!(sc_re, r"^SC-\d{3}$");

pub fn validate_phase_id(id: &str) -> Result<()> {
    check(id, phase_re(), "PHASE-NNN", "PHASE-001")
}

pub fn validate_milestone_id(id: &str) -> Result<()> {
    check(id, milestone_re(), "MS-NNN", "MS-001")
}

pub fn validate_task_id(id: &str) -> Result<()> {
    check(id, task_re(), "TNNN", "T001")
}

pub fn validate_ac_id(id: &str) -> Result<()> {
    check(id, ac_re(), "AC-NNN", "AC-001")
}

pub fn validate_sc_id(id: &str) -> Result<()> {
    check(id, sc_re(), "SC-NNN", "SC-001")
}

fn check(id: &str, re: &Regex, expected: &'static str, example: &'static str) -> Result<()> {
    if re.is_match(id) {
        Ok(())
    } else {
        Err(WardenError::InvalidId {
            id: id.to_string(),
            expected,
            example,
        })
    }
}

// ---------------------------------------------------------------------------
// Positional ID generation (0-based index)
// ---------------------------------------------------------------------------

pub fn phase_id(index: usize) -> String {
    format!("PHASE-{:03}", index + 1)
}

pub fn milestone_id(index: usize) -> String {
    format!("MS-{:03}", index + 1)
}

pub fn task_id(index: usize) -> String {
    format!("T{:03}", index + 1)
}

// ---------------------------------------------------------------------------
// Target detection
// ---------------------------------------------------------------------------

/// What a status-update ID refers to, detected from its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Project,
    Current,
    Phase(String),
    Milestone(String),
    Task(String),
    Acceptance(String),
    Success(String),
}

/// Classify a target ID (`T001`, `MS-001`, `PHASE-001`, `3`, `AC-001`,
/// `SC-001`, `project`, `current`). Matching is case-insensitive; the
/// returned ID is normalized to upper case.
pub fn detect_target(raw: &str) -> Result<Target> {
    let id = raw.trim();
    match id.to_ascii_lowercase().as_str() {
        "project" => return Ok(Target::Project),
        "current" => return Ok(Target::Current),
        _ => {}
    }

    let upper = id.to_ascii_uppercase();
    if task_re().is_match(&upper) {
        return Ok(Target::Task(upper));
    }
    if milestone_re().is_match(&upper) {
        return Ok(Target::Milestone(upper));
    }
    if ac_re().is_match(&upper) {
        return Ok(Target::Acceptance(upper));
    }
    if sc_re().is_match(&upper) {
        return Ok(Target::Success(upper));
    }
    if phase_re().is_match(&upper) {
        return Ok(Target::Phase(upper));
    }
    // Bare phase number, e.g. "3" -> PHASE-003
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(n) = id.parse::<usize>() {
            if n >= 1 && n <= 999 {
                return Ok(Target::Phase(format!("PHASE-{n:03}")));
            }
        }
    }

    Err(WardenError::InvalidId {
        id: id.to_string(),
        expected: "TNNN, MS-NNN, PHASE-NNN, AC-NNN, SC-NNN, project, or current",
        example: "T001",
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        validate_phase_id("PHASE-001").unwrap();
        validate_milestone_id("MS-042").unwrap();
        validate_task_id("T001").unwrap();
        validate_ac_id("AC-100").unwrap();
        validate_sc_id("SC-003").unwrap();
    }

    #[test]
    fn invalid_ids() {
        assert!(validate_task_id("T1").is_err());
        assert!(validate_task_id("T0001").is_err());
        assert!(validate_milestone_id("MS-1").is_err());
        assert!(validate_milestone_id("ms-001").is_err());
        assert!(validate_ac_id("AC001").is_err());
        assert!(validate_phase_id("PHASE-1").is_err());
    }

    #[test]
    fn positional_generation() {
        assert_eq!(phase_id(0), "PHASE-001");
        assert_eq!(milestone_id(11), "MS-012");
        assert_eq!(task_id(99), "T100");
    }

    #[test]
    fn detect_targets() {
        assert_eq!(detect_target("T001").unwrap(), Target::Task("T001".into()));
        assert_eq!(
            detect_target("t002").unwrap(),
            Target::Task("T002".into()),
            "lowercase task ids are normalized"
        );
        assert_eq!(
            detect_target("MS-001").unwrap(),
            Target::Milestone("MS-001".into())
        );
        assert_eq!(
            detect_target("AC-010").unwrap(),
            Target::Acceptance("AC-010".into())
        );
        assert_eq!(
            detect_target("SC-001").unwrap(),
            Target::Success("SC-001".into())
        );
        assert_eq!(
            detect_target("PHASE-002").unwrap(),
            Target::Phase("PHASE-002".into())
        );
        assert_eq!(detect_target("3").unwrap(), Target::Phase("PHASE-003".into()));
        assert_eq!(detect_target("project").unwrap(), Target::Project);
        assert_eq!(detect_target("Current").unwrap(), Target::Current);
    }

    #[test]
    fn detect_rejects_unknown() {
        assert!(detect_target("TASK-1").is_err());
        assert!(detect_target("").is_err());
        assert!(detect_target("0").is_err());
    }
}
