//! Arms the build workflow: a `build`/`implement` skill (PreToolUse) or a
//! `/build`-style prompt (UserPromptSubmit) sets `build_active` and arms
//! every guardrail policy.

use std::path::Path;
use warden_core::cache::Cache;
use warden_core::guardrail::builtin_policies;
use warden_core::hook::{HookDecision, HookInput, EVENT_USER_PROMPT_SUBMIT};

pub fn handle(root: &Path, input: &HookInput) -> HookDecision {
    let triggered = if input.hook_event_name == EVENT_USER_PROMPT_SUBMIT {
        let prompt = input.prompt.trim_start();
        prompt.starts_with("/build") || prompt.starts_with("/implement")
    } else {
        input.tool_name == "Skill"
            && matches!(input.tool_input.skill.as_str(), "build" | "implement")
    };

    if triggered {
        let mut cache = Cache::load(root);
        cache.build_active = true;
        for policy in builtin_policies() {
            cache.set_guardrail(policy.name, true);
        }
        let _ = cache.save(root);
        tracing::info!("build workflow armed");
    }
    HookDecision::Allow
}
