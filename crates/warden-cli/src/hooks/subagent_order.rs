//! Validates `Task` subagent spawns against the active workflow phase.

use std::path::Path;
use warden_core::cache::Cache;
use warden_core::hook::{HookDecision, HookInput};
use warden_core::workflow::{validate_code_subagent, WorkflowPhase, CODE_SEQUENCE};

pub fn handle(root: &Path, input: &HookInput) -> HookDecision {
    if input.tool_name != "Task" || input.tool_input.subagent_type.is_empty() {
        return HookDecision::Allow;
    }
    let subagent = input.tool_input.subagent_type.as_str();

    let mut cache = Cache::load(root);
    let Some(phase) = cache.current_phase else {
        return HookDecision::Allow;
    };

    // Subagents we know nothing about pass through.
    let known = WorkflowPhase::all()
        .iter()
        .any(|p| p.allowed_subagents().contains(&subagent));
    if !known {
        tracing::info!(subagent, "unknown subagent type, allowing");
        return HookDecision::Allow;
    }

    if !phase.allowed_subagents().contains(&subagent) {
        return HookDecision::Block(format!(
            "{} does not belong to the {} phase (allowed: {})",
            subagent,
            phase,
            phase.allowed_subagents().join(", ")
        ));
    }

    if phase == WorkflowPhase::Code && CODE_SEQUENCE.contains(&subagent) {
        match validate_code_subagent(cache.code_phase_position, subagent) {
            Ok(position) => {
                cache.code_phase_position = position;
                let _ = cache.save(root);
            }
            Err(e) => return HookDecision::Block(e.to_string()),
        }
    }

    HookDecision::Allow
}
