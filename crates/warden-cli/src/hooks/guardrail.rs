//! Subagent guardrail enforcement.
//!
//! A `Task` PreToolUse naming a policed subagent arms that policy and
//! records it as the active subagent; `SubagentStop` disarms it. While
//! armed, every other PreToolUse is checked against the policy: blocked
//! tools, skill allowlists, safe-bash restriction, and path rules. The
//! engineer task log gate runs first: engineer-class subagents may use
//! nothing but Skill until they log their task in progress.

use super::path_context;
use std::path::Path;
use warden_core::cache::Cache;
use warden_core::config::Config;
use warden_core::guardrail::{is_safe_git, policy_for, ENGINEER_AGENTS};
use warden_core::hook::{HookDecision, HookInput, EVENT_SUBAGENT_STOP};

pub fn handle(root: &Path, input: &HookInput) -> HookDecision {
    let mut cache = Cache::load(root);

    if input.hook_event_name == EVENT_SUBAGENT_STOP {
        if let Some(active) = cache.current_subagent.take() {
            cache.set_guardrail(&active, false);
            cache.engineer_task_logged = false;
            let _ = cache.save(root);
        }
        return HookDecision::Allow;
    }

    // Task spawns arm the matching policy.
    if input.tool_name == "Task" {
        let subagent = input.tool_input.subagent_type.as_str();
        if policy_for(subagent).is_some() || ENGINEER_AGENTS.contains(&subagent) {
            cache.current_subagent = Some(subagent.to_string());
            cache.set_guardrail(subagent, true);
            cache.engineer_task_logged = false;
            let _ = cache.save(root);
        } else if !subagent.is_empty() {
            tracing::info!(subagent, "no guardrail policy, allowing");
        }
        return HookDecision::Allow;
    }

    let Some(active) = cache.current_subagent.clone() else {
        return HookDecision::Allow;
    };
    if !cache.guardrail_active(&active) {
        return HookDecision::Allow;
    }

    if let Some(decision) = engineer_gate(root, &mut cache, &active, input) {
        return decision;
    }

    let Some(policy) = policy_for(&active) else {
        return HookDecision::Allow;
    };

    if policy.tool_blocked(&input.tool_name) {
        return HookDecision::Block(format!(
            "{} may not use the {} tool",
            active, input.tool_name
        ));
    }

    if input.tool_name == "Skill" && !policy.skill_allowed(&input.tool_input.skill) {
        return HookDecision::Block(format!(
            "{} may not invoke the {} skill",
            active, input.tool_input.skill
        ));
    }

    if input.tool_name == "Bash" && policy.safe_bash_only {
        let command = input.tool_input.command.as_str();
        let extra_ok = Config::load_or_default(root)
            .map(|c| {
                c.safe_bash_patterns
                    .iter()
                    .filter_map(|p| regex::Regex::new(p).ok())
                    .any(|re| re.is_match(command.trim()))
            })
            .unwrap_or(false);
        if !is_safe_git(command) && !extra_ok {
            return HookDecision::Block(format!(
                "{} may only run read-only git commands, not: {}",
                active, command
            ));
        }
    }

    if policy.tool_guarded(&input.tool_name) && !input.tool_input.file_path.is_empty() {
        let Some(ctx) = path_context(root, &input.session_id) else {
            return HookDecision::Allow;
        };
        if let Some(reason) = policy.check_path(&input.tool_input.file_path, &ctx) {
            return HookDecision::Block(reason);
        }
    }

    HookDecision::Allow
}

/// Engineer subagents must mark their task in progress before touching
/// anything else. Returns a decision when the gate applies.
fn engineer_gate(
    root: &Path,
    cache: &mut Cache,
    active: &str,
    input: &HookInput,
) -> Option<HookDecision> {
    if !ENGINEER_AGENTS.contains(&active) || cache.engineer_task_logged {
        return None;
    }
    if input.tool_name == "Skill" {
        if input.tool_input.skill == "log:task" && input.tool_input.args.contains("in_progress") {
            cache.engineer_task_logged = true;
            let _ = cache.save(root);
        }
        return None;
    }
    Some(HookDecision::Block(format!(
        "{} must log its task first: run the log:task skill with \"<task-id> in_progress\"",
        active
    )))
}
