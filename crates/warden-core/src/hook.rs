//! The agent hook wire protocol.
//!
//! Hook handlers read one JSON document from stdin describing the event and
//! the pending tool call, and answer through exit codes: 0 allows, 2 with a
//! reason on stderr blocks. Stop hooks instead answer with a JSON decision
//! on stdout. [`HookDecision`] captures every answer shape a handler can
//! produce; the CLI maps it onto the process exit.

use serde::{Deserialize, Serialize};

pub const EVENT_PRE_TOOL_USE: &str = "PreToolUse";
pub const EVENT_USER_PROMPT_SUBMIT: &str = "UserPromptSubmit";
pub const EVENT_SESSION_START: &str = "SessionStart";
pub const EVENT_STOP: &str = "Stop";
pub const EVENT_SUBAGENT_STOP: &str = "SubagentStop";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HookInput {
    #[serde(default)]
    pub hook_event_name: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: ToolInput,
    #[serde(default)]
    pub prompt: String,
}

/// The union of tool parameters the handlers inspect. Unknown fields are
/// ignored so new tools never break parsing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub old_string: String,
    #[serde(default)]
    pub new_string: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub args: String,
    #[serde(default)]
    pub subagent_type: String,
}

impl HookInput {
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookDecision {
    /// Let the tool call proceed.
    Allow,
    /// Let it proceed and inject extra context into the conversation.
    AllowWithContext { event: String, context: String },
    /// Block the tool call with a reason shown to the agent.
    Block(String),
    /// Answer a Stop hook: either let the agent stop or force it to continue.
    Stop { allow: bool, reason: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContextOutput<'a> {
    hook_specific_output: HookSpecificOutput<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HookSpecificOutput<'a> {
    hook_event_name: &'a str,
    additional_context: &'a str,
}

impl HookDecision {
    /// The process exit code for this decision.
    pub fn exit_code(&self) -> i32 {
        match self {
            HookDecision::Block(_) => 2,
            _ => 0,
        }
    }

    /// What to print on stdout, if anything.
    pub fn stdout(&self) -> Option<String> {
        match self {
            HookDecision::Allow => None,
            HookDecision::AllowWithContext { event, context } => {
                serde_json::to_string(&ContextOutput {
                    hook_specific_output: HookSpecificOutput {
                        hook_event_name: event,
                        additional_context: context,
                    },
                })
                .ok()
            }
            HookDecision::Block(_) => None,
            HookDecision::Stop { allow, reason } => {
                if *allow {
                    Some(r#"{"continue": true}"#.to_string())
                } else {
                    serde_json::to_string(&serde_json::json!({
                        "decision": "block",
                        "reason": reason,
                    }))
                    .ok()
                }
            }
        }
    }

    /// What to print on stderr, if anything.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            HookDecision::Block(reason) => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pre_tool_use_input() {
        let input = HookInput::parse(
            r#"{
                "hook_event_name": "PreToolUse",
                "session_id": "s1",
                "tool_name": "Write",
                "tool_input": {"file_path": "src/lib.rs", "content": "x"}
            }"#,
        );
        assert_eq!(input.hook_event_name, EVENT_PRE_TOOL_USE);
        assert_eq!(input.tool_name, "Write");
        assert_eq!(input.tool_input.file_path, "src/lib.rs");
    }

    #[test]
    fn malformed_input_defaults_to_empty() {
        let input = HookInput::parse("not json");
        assert!(input.tool_name.is_empty());
    }

    #[test]
    fn unknown_tool_fields_are_ignored() {
        let input = HookInput::parse(
            r#"{"tool_name": "Task", "tool_input": {"subagent_type": "code-reviewer", "novel": 1}}"#,
        );
        assert_eq!(input.tool_input.subagent_type, "code-reviewer");
    }

    #[test]
    fn block_maps_to_exit_2_with_stderr() {
        let d = HookDecision::Block("no".into());
        assert_eq!(d.exit_code(), 2);
        assert_eq!(d.stderr(), Some("no"));
        assert!(d.stdout().is_none());
    }

    #[test]
    fn stop_block_emits_decision_json() {
        let d = HookDecision::Stop {
            allow: false,
            reason: "tasks remain".into(),
        };
        assert_eq!(d.exit_code(), 0);
        let out = d.stdout().unwrap();
        assert!(out.contains(r#""decision":"block""#));
        assert!(out.contains("tasks remain"));
    }

    #[test]
    fn stop_allow_emits_continue() {
        let d = HookDecision::Stop {
            allow: true,
            reason: String::new(),
        };
        assert_eq!(d.stdout().unwrap(), r#"{"continue": true}"#);
    }

    #[test]
    fn context_output_uses_camel_case_keys() {
        let d = HookDecision::AllowWithContext {
            event: EVENT_SESSION_START.into(),
            context: "roadmap summary".into(),
        };
        let out = d.stdout().unwrap();
        assert!(out.contains("hookSpecificOutput"));
        assert!(out.contains("additionalContext"));
    }
}
