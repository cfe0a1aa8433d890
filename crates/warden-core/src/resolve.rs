//! Cascading status resolution.
//!
//! Task statuses are the ground truth; milestone and phase statuses are
//! derived from them, with success criteria gating completion. The resolver
//! also moves the current-work pointer to the first non-completed item at
//! each level and refreshes the summary counts.

use crate::roadmap::Roadmap;
use crate::types::Status;

/// One change the resolver applied, for reporting to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub entity: String,
    pub message: String,
}

impl Resolution {
    fn new(entity: &str, message: impl Into<String>) -> Self {
        Self {
            entity: entity.to_string(),
            message: message.into(),
        }
    }
}

/// Run the full cascade over the roadmap in place. Returns the changes made,
/// in the order they were applied.
pub fn resolve(roadmap: &mut Roadmap) -> Vec<Resolution> {
    let mut changes = Vec::new();

    for pi in 0..roadmap.phases.len() {
        for mi in 0..roadmap.phases[pi].milestones.len() {
            resolve_milestone(roadmap, pi, mi, &mut changes);
        }
        resolve_phase(roadmap, pi, &mut changes);
    }

    update_current(roadmap, &mut changes);
    roadmap.recompute_summary();
    changes
}

fn resolve_milestone(roadmap: &mut Roadmap, pi: usize, mi: usize, changes: &mut Vec<Resolution>) {
    let milestone = &roadmap.phases[pi].milestones[mi];
    if milestone.tasks.is_empty() {
        // An empty milestone has no evidence either way. Leave it alone.
        return;
    }
    if milestone.status == Status::Blocked {
        // Blocked is a manual flag; only a human (or the CLI) clears it.
        return;
    }

    let all_completed = milestone.tasks.iter().all(|t| t.status == Status::Completed);
    let any_started = milestone
        .tasks
        .iter()
        .any(|t| t.status != Status::NotStarted);
    let unmet_scs = roadmap.unmet_scs(milestone);
    let id = milestone.id.clone();
    let status = milestone.status;

    let next = if all_completed {
        if unmet_scs.is_empty() {
            Status::Completed
        } else {
            // Reported even when the status does not change, so the caller
            // learns why the milestone is held open.
            changes.push(Resolution::new(
                &id,
                format!(
                    "all tasks completed but success criteria unmet: {}",
                    unmet_scs.join(", ")
                ),
            ));
            Status::InProgress
        }
    } else if any_started {
        Status::InProgress
    } else {
        Status::NotStarted
    };

    if next != status {
        roadmap.phases[pi].milestones[mi].status = next;
        changes.push(Resolution::new(&id, format!("{status} -> {next}")));
    }
}

fn resolve_phase(roadmap: &mut Roadmap, pi: usize, changes: &mut Vec<Resolution>) {
    let phase = &roadmap.phases[pi];
    if phase.milestones.is_empty() || phase.status == Status::Blocked {
        return;
    }
    let all_completed = phase
        .milestones
        .iter()
        .all(|m| m.status == Status::Completed);
    let any_started = phase
        .milestones
        .iter()
        .any(|m| m.status != Status::NotStarted);
    let next = if all_completed {
        Status::Completed
    } else if any_started {
        Status::InProgress
    } else {
        Status::NotStarted
    };
    if next != phase.status {
        let id = phase.id.clone();
        let status = phase.status;
        roadmap.phases[pi].status = next;
        changes.push(Resolution::new(&id, format!("{status} -> {next}")));
    }
}

/// Point `current` at the first non-completed phase, milestone and task.
/// When everything is completed the pointer falls back to the last items so
/// it never dangles.
fn update_current(roadmap: &mut Roadmap, changes: &mut Vec<Resolution>) {
    let mut phase_id = None;
    let mut milestone_id = None;
    let mut task_id = None;

    'scan: for phase in &roadmap.phases {
        if phase.status == Status::Completed {
            continue;
        }
        phase_id = Some(phase.id.clone());
        for milestone in &phase.milestones {
            if milestone.status == Status::Completed {
                continue;
            }
            milestone_id = Some(milestone.id.clone());
            for task in &milestone.tasks {
                if task.status != Status::Completed {
                    task_id = Some(task.id.clone());
                    break 'scan;
                }
            }
            break 'scan;
        }
        break;
    }

    if phase_id.is_none() {
        if let Some(phase) = roadmap.phases.last() {
            phase_id = Some(phase.id.clone());
            if let Some(milestone) = phase.milestones.last() {
                milestone_id = Some(milestone.id.clone());
                task_id = milestone.tasks.last().map(|t| t.id.clone());
            }
        }
    }

    if phase_id != roadmap.current.phase
        || milestone_id != roadmap.current.milestone
        || task_id != roadmap.current.task
    {
        changes.push(Resolution::new(
            "current",
            format!(
                "now {} / {} / {}",
                phase_id.as_deref().unwrap_or("-"),
                milestone_id.as_deref().unwrap_or("-"),
                task_id.as_deref().unwrap_or("-"),
            ),
        ));
        roadmap.current.phase = phase_id;
        roadmap.current.milestone = milestone_id;
        roadmap.current.task = task_id;
    }
}
