//! The `log:task` / `log:ac` / `log:sc` skill handler: applies the guarded
//! status update, runs the resolver, and feeds the resolutions back to the
//! agent as additional context.

use std::path::Path;
use warden_core::hook::{HookDecision, HookInput, EVENT_PRE_TOOL_USE};
use warden_core::resolve::resolve;
use warden_core::roadmap::Roadmap;
use warden_core::types::{CriterionStatus, Status};

pub fn handle(root: &Path, input: &HookInput) -> HookDecision {
    if input.tool_name != "Skill" {
        return HookDecision::Allow;
    }
    let skill = input.tool_input.skill.as_str();
    if !matches!(skill, "log:task" | "log:ac" | "log:sc") {
        return HookDecision::Allow;
    }

    let mut parts = input.tool_input.args.split_whitespace();
    let (Some(id), Some(status)) = (parts.next(), parts.next()) else {
        return HookDecision::Block(format!(
            "{skill} takes \"<id> <status>\", e.g. \"{}\"",
            example(skill)
        ));
    };

    let mut roadmap = match Roadmap::load(root) {
        Ok(r) => r,
        Err(_) => return HookDecision::Allow,
    };

    let result = match skill {
        "log:task" => apply_task(&mut roadmap, id, status),
        "log:ac" => apply_criterion(&mut roadmap, id, status, true),
        _ => apply_criterion(&mut roadmap, id, status, false),
    };
    if let Err(reason) = result {
        return HookDecision::Block(reason);
    }

    let changes = resolve(&mut roadmap);
    if roadmap.save(root).is_err() {
        return HookDecision::Allow;
    }

    let mut context = format!("{id} is now {status}.");
    for change in &changes {
        context.push_str(&format!(" {}: {}.", change.entity, change.message));
    }
    HookDecision::AllowWithContext {
        event: EVENT_PRE_TOOL_USE.to_string(),
        context,
    }
}

fn apply_task(roadmap: &mut Roadmap, id: &str, status: &str) -> Result<(), String> {
    let status: Status = status
        .parse()
        .map_err(|_| format!("task status must be completed, in_progress, or blocked, e.g. \"{}\"", example("log:task")))?;
    if status == Status::NotStarted {
        return Err("tasks are logged forward: completed, in_progress, or blocked".to_string());
    }
    roadmap.set_task_status(id, status).map_err(|e| e.to_string())
}

fn apply_criterion(
    roadmap: &mut Roadmap,
    id: &str,
    status: &str,
    acceptance: bool,
) -> Result<(), String> {
    let status = match status {
        "met" => CriterionStatus::Met,
        "unmet" => CriterionStatus::Unmet,
        _ => {
            let skill = if acceptance { "log:ac" } else { "log:sc" };
            return Err(format!(
                "criterion status must be met or unmet, e.g. \"{}\"",
                example(skill)
            ));
        }
    };
    let owner = if acceptance {
        roadmap
            .current
            .task
            .clone()
            .ok_or("no current task to attach the criterion update to")?
    } else {
        roadmap
            .current
            .milestone
            .clone()
            .ok_or("no current milestone to attach the criterion update to")?
    };
    roadmap
        .set_criterion_status(&owner, id, status)
        .map_err(|e| e.to_string())
}

fn example(skill: &str) -> &'static str {
    match skill {
        "log:task" => "T001 in_progress",
        "log:ac" => "AC-001 met",
        _ => "SC-001 met",
    }
}
