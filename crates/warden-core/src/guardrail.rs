//! Per-subagent guardrail policies.
//!
//! Each policy names the tools it guards, where the subagent may write,
//! which skills it may invoke and whether Bash is restricted to read-only
//! git commands. Policies are keyed by subagent type and consulted by the
//! hook layer while the matching subagent is active.

use crate::paths;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum SkillRule {
    /// Any skill invocation is allowed.
    Any,
    /// Only the named skills are allowed.
    Only(BTreeSet<&'static str>),
}

#[derive(Debug, Clone)]
pub enum PathRule {
    /// Writes allowed anywhere under the active milestone workspace.
    MilestoneDir { subfolder: &'static str },
    /// Writes allowed only to `<subfolder>/<prefix>_<date>_<session>.md`
    /// inside the milestone workspace.
    SessionFile {
        subfolder: &'static str,
        prefix: &'static str,
    },
    /// Writes allowed when the path matches one of the patterns.
    Patterns { allow: &'static [&'static str] },
    /// Writes blocked for one extension, with named exceptions.
    BlockExtension {
        extension: &'static str,
        except: &'static [&'static str],
    },
}

#[derive(Debug, Clone)]
pub struct GuardrailPolicy {
    pub name: &'static str,
    /// Tools whose file writes are checked against the path rule.
    pub guarded_tools: &'static [&'static str],
    /// Tools blocked outright.
    pub blocked_tools: &'static [&'static str],
    pub skills: SkillRule,
    pub safe_bash_only: bool,
    pub path_rule: Option<PathRule>,
}

/// Context for evaluating path rules: the active version, the folder of the
/// milestone being worked on, today's date and the hook session id.
#[derive(Debug, Clone)]
pub struct PathContext {
    pub version: String,
    pub milestone_folder: String,
    pub date: String,
    pub session_id: String,
}

const WRITE_TOOLS: &[&str] = &["Write", "Edit", "MultiEdit", "NotebookEdit"];

// ---------------------------------------------------------------------------
// Builtin policies
// ---------------------------------------------------------------------------

pub fn builtin_policies() -> Vec<GuardrailPolicy> {
    vec![
        GuardrailPolicy {
            name: "codebase-explorer",
            guarded_tools: WRITE_TOOLS,
            blocked_tools: &[],
            skills: SkillRule::Any,
            safe_bash_only: false,
            path_rule: Some(PathRule::SessionFile {
                subfolder: "codebase-status",
                prefix: "codebase-status",
            }),
        },
        GuardrailPolicy {
            name: "planning-specialist",
            guarded_tools: WRITE_TOOLS,
            blocked_tools: &[],
            skills: SkillRule::Any,
            safe_bash_only: false,
            path_rule: Some(PathRule::SessionFile {
                subfolder: "plans",
                prefix: "plan",
            }),
        },
        GuardrailPolicy {
            name: "plan-consultant",
            guarded_tools: WRITE_TOOLS,
            blocked_tools: &[],
            skills: SkillRule::Any,
            safe_bash_only: false,
            path_rule: Some(PathRule::MilestoneDir {
                subfolder: "decisions",
            }),
        },
        GuardrailPolicy {
            name: "code-reviewer",
            guarded_tools: WRITE_TOOLS,
            blocked_tools: &[],
            skills: SkillRule::Any,
            safe_bash_only: false,
            path_rule: Some(PathRule::SessionFile {
                subfolder: "revisions",
                prefix: "revisions",
            }),
        },
        GuardrailPolicy {
            name: "test-engineer",
            guarded_tools: WRITE_TOOLS,
            blocked_tools: &[],
            skills: SkillRule::Any,
            safe_bash_only: false,
            path_rule: Some(PathRule::Patterns {
                allow: TEST_PATTERNS,
            }),
        },
        GuardrailPolicy {
            name: "fullstack-developer",
            guarded_tools: WRITE_TOOLS,
            blocked_tools: &[],
            skills: SkillRule::Any,
            safe_bash_only: false,
            path_rule: Some(PathRule::BlockExtension {
                extension: ".md",
                except: &["README.md"],
            }),
        },
        GuardrailPolicy {
            name: "version-manager",
            guarded_tools: &[],
            blocked_tools: &["Write", "Edit", "MultiEdit"],
            skills: SkillRule::Any,
            safe_bash_only: true,
            path_rule: None,
        },
        GuardrailPolicy {
            name: "project-manager",
            guarded_tools: &[],
            blocked_tools: &["Write", "Edit"],
            skills: SkillRule::Only(["log:task", "log:ac", "log:sc"].into_iter().collect()),
            safe_bash_only: false,
            path_rule: None,
        },
    ]
}

pub fn policy_for(subagent: &str) -> Option<GuardrailPolicy> {
    builtin_policies().into_iter().find(|p| p.name == subagent)
}

/// Subagents that must log their task in_progress before using other tools.
pub const ENGINEER_AGENTS: &[&str] = &[
    "test-engineer",
    "fullstack-developer",
    "backend-engineer",
    "frontend-engineer",
];

const TEST_PATTERNS: &[&str] = &[
    r"\.test\.(ts|tsx|js|jsx)$",
    r"\.spec\.(ts|tsx|js|jsx)$",
    r"(^|/)test_[^/]*\.py$",
    r"(^|/)[^/]*_test\.py$",
    r"(^|/)conftest\.py$",
    r"(^|/)(tests?|__tests__)/",
];

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

impl GuardrailPolicy {
    pub fn tool_blocked(&self, tool: &str) -> bool {
        self.blocked_tools.contains(&tool)
    }

    pub fn tool_guarded(&self, tool: &str) -> bool {
        self.guarded_tools.contains(&tool)
    }

    pub fn skill_allowed(&self, skill: &str) -> bool {
        match &self.skills {
            SkillRule::Any => true,
            SkillRule::Only(set) => set.contains(skill),
        }
    }

    /// Check a file write against the path rule. Returns a human-readable
    /// reason when the write must be blocked, None when it is allowed.
    pub fn check_path(&self, file_path: &str, ctx: &PathContext) -> Option<String> {
        let rule = self.path_rule.as_ref()?;
        let normalized = file_path.replace('\\', "/");
        match rule {
            PathRule::MilestoneDir { subfolder } => {
                let allowed = milestone_subpath(ctx, subfolder);
                if normalized.contains(&allowed) {
                    None
                } else {
                    Some(format!(
                        "{} may only write under {}",
                        self.name, allowed
                    ))
                }
            }
            PathRule::SessionFile { subfolder, prefix } => {
                let dir = milestone_subpath(ctx, subfolder);
                let expected = format!("{dir}/{prefix}_{}_{}.md", ctx.date, ctx.session_id);
                if normalized.contains(&expected) {
                    None
                } else {
                    Some(format!("{} may only write {}", self.name, expected))
                }
            }
            PathRule::Patterns { allow } => {
                let matched = allow
                    .iter()
                    .filter_map(|p| Regex::new(p).ok())
                    .any(|re| re.is_match(&normalized));
                if matched {
                    None
                } else {
                    Some(format!(
                        "{} may only write test files, not {}",
                        self.name, file_path
                    ))
                }
            }
            PathRule::BlockExtension { extension, except } => {
                if !normalized.ends_with(extension) {
                    return None;
                }
                let file_name = Path::new(&normalized)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("");
                if except.contains(&file_name) {
                    None
                } else {
                    Some(format!(
                        "{} may not write {} files ({})",
                        self.name, extension, file_path
                    ))
                }
            }
        }
    }
}

fn milestone_subpath(ctx: &PathContext, subfolder: &str) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        paths::PROJECT_DIR,
        ctx.version,
        "phases/milestones",
        ctx.milestone_folder,
        subfolder
    )
}

// ---------------------------------------------------------------------------
// Safe git commands
// ---------------------------------------------------------------------------

/// Whether a Bash command is one of the read-only git operations the
/// version-manager may run freely.
pub fn is_safe_git(command: &str) -> bool {
    static SAFE: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = SAFE.get_or_init(|| {
        [
            r"(?i)^git\s+status\b",
            r"(?i)^git\s+log\b",
            r"(?i)^git\s+diff\b",
            r"(?i)^git\s+show\b",
            r"(?i)^git\s+branch\s*$",
            r"(?i)^git\s+branch\s+(-a|-r|-v|--list)\b",
            r"(?i)^git\s+remote\s+(-v|show)\b",
            r"(?i)^git\s+tag\s*$",
            r"(?i)^git\s+tag\s+(-l|--list)\b",
            r"(?i)^git\s+describe\b",
            r"(?i)^git\s+rev-parse\b",
            r"(?i)^git\s+ls-files\b",
            r"(?i)^git\s+blame\b",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    });
    let trimmed = command.trim();
    patterns.iter().any(|re| re.is_match(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PathContext {
        PathContext {
            version: "0.1.0".into(),
            milestone_folder: "MS-001_core-types".into(),
            date: "2026-08-30".into(),
            session_id: "abc123".into(),
        }
    }

    #[test]
    fn every_builtin_has_a_unique_name() {
        let policies = builtin_policies();
        let names: BTreeSet<_> = policies.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), policies.len());
    }

    #[test]
    fn explorer_writes_only_its_session_file() {
        let policy = policy_for("codebase-explorer").unwrap();
        let ok = "project/0.1.0/phases/milestones/MS-001_core-types/codebase-status/codebase-status_2026-08-30_abc123.md";
        assert!(policy.check_path(ok, &ctx()).is_none());
        let bad = "project/0.1.0/phases/milestones/MS-001_core-types/codebase-status/notes.md";
        assert!(policy.check_path(bad, &ctx()).is_some());
    }

    #[test]
    fn consultant_writes_anywhere_in_decisions() {
        let policy = policy_for("plan-consultant").unwrap();
        let ok = "/repo/project/0.1.0/phases/milestones/MS-001_core-types/decisions/tradeoffs.md";
        assert!(policy.check_path(ok, &ctx()).is_none());
        let bad = "/repo/src/main.rs";
        assert!(policy.check_path(bad, &ctx()).is_some());
    }

    #[test]
    fn test_engineer_matches_test_files() {
        let policy = policy_for("test-engineer").unwrap();
        assert!(policy.check_path("src/app.test.ts", &ctx()).is_none());
        assert!(policy.check_path("tests/integration.rs", &ctx()).is_none());
        assert!(policy.check_path("pkg/test_parser.py", &ctx()).is_none());
        assert!(policy.check_path("src/app.ts", &ctx()).is_some());
    }

    #[test]
    fn developer_blocked_from_markdown_except_readme() {
        let policy = policy_for("fullstack-developer").unwrap();
        assert!(policy.check_path("docs/design.md", &ctx()).is_some());
        assert!(policy.check_path("README.md", &ctx()).is_none());
        assert!(policy.check_path("src/lib.rs", &ctx()).is_none());
    }

    #[test]
    fn version_manager_blocks_edits_entirely() {
        let policy = policy_for("version-manager").unwrap();
        assert!(policy.tool_blocked("Write"));
        assert!(policy.safe_bash_only);
    }

    #[test]
    fn project_manager_allows_only_log_skills() {
        let policy = policy_for("project-manager").unwrap();
        assert!(policy.skill_allowed("log:task"));
        assert!(!policy.skill_allowed("deploy:prod"));
    }

    #[test]
    fn safe_git_accepts_read_only_commands() {
        assert!(is_safe_git("git status"));
        assert!(is_safe_git("git log --oneline -5"));
        assert!(is_safe_git("  git diff HEAD~1"));
        assert!(is_safe_git("git branch -a"));
    }

    #[test]
    fn safe_git_rejects_mutations() {
        assert!(!is_safe_git("git push origin main"));
        assert!(!is_safe_git("git commit -m x"));
        assert!(!is_safe_git("git branch new-feature"));
        assert!(!is_safe_git("rm -rf /"));
    }
}
