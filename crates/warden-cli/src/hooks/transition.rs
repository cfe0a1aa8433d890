//! Gates workflow-phase skill invocations against the fixed sequence.

use std::path::Path;
use warden_core::cache::Cache;
use warden_core::hook::{HookDecision, HookInput};
use warden_core::workflow::{validate_transition, WorkflowPhase};

pub fn handle(root: &Path, input: &HookInput) -> HookDecision {
    if input.tool_name != "Skill" {
        return HookDecision::Allow;
    }
    let name = input
        .tool_input
        .skill
        .strip_prefix("phase:")
        .unwrap_or(&input.tool_input.skill);
    let Ok(next) = name.parse::<WorkflowPhase>() else {
        // Not a phase skill, nothing to gate.
        return HookDecision::Allow;
    };

    let mut cache = Cache::load(root);
    if !cache.build_active {
        return HookDecision::Allow;
    }

    if let Err(e) = validate_transition(cache.current_phase, next) {
        return HookDecision::Block(e.to_string());
    }

    if let Some(current) = cache.current_phase {
        if current != next && !cache.phases_completed.contains(&current) {
            cache.phases_completed.push(current);
        }
    }
    if cache.current_phase != Some(next) && next == WorkflowPhase::Code {
        cache.code_phase_position = 0;
    }
    cache.current_phase = Some(next);
    let _ = cache.save(root);
    HookDecision::Allow
}
