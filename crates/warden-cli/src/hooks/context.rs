//! SessionStart: record the session id and inject a roadmap summary.

use std::path::Path;
use warden_core::cache::Cache;
use warden_core::hook::{HookDecision, HookInput, EVENT_SESSION_START};
use warden_core::roadmap::Roadmap;

pub fn handle(root: &Path, input: &HookInput) -> HookDecision {
    if !input.session_id.is_empty() {
        let mut cache = Cache::load(root);
        if cache.session_id != input.session_id {
            cache.session_id = input.session_id.clone();
            let _ = cache.save(root);
        }
    }

    let Ok(roadmap) = Roadmap::load(root) else {
        return HookDecision::Allow;
    };

    let dash = "-".to_string();
    let context = format!(
        "Project {} {} is {}. Current work: phase {}, milestone {}, task {}. \
         Tasks {}/{} completed ({} pending). Use `warden status show` for detail.",
        roadmap.project.name,
        roadmap.project.version,
        roadmap.project.status,
        roadmap.current.phase.as_ref().unwrap_or(&dash),
        roadmap.current.milestone.as_ref().unwrap_or(&dash),
        roadmap.current.task.as_ref().unwrap_or(&dash),
        roadmap.summary.tasks.completed,
        roadmap.summary.tasks.total,
        roadmap.summary.tasks.pending,
    );

    HookDecision::AllowWithContext {
        event: EVENT_SESSION_START.to_string(),
        context,
    }
}
