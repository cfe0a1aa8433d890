//! Stop hook: while a build is active, the agent may not stop until the
//! current milestone is completed. Any lookup failure deactivates the build
//! flag and allows the stop so a broken roadmap never wedges the session.

use std::path::Path;
use warden_core::cache::Cache;
use warden_core::hook::{HookDecision, HookInput};
use warden_core::roadmap::Roadmap;
use warden_core::types::Status;

pub fn handle(root: &Path, _input: &HookInput) -> HookDecision {
    let mut cache = Cache::load(root);
    if !cache.build_active {
        return HookDecision::Stop {
            allow: true,
            reason: String::new(),
        };
    }

    let milestone_status = Roadmap::load(root).ok().and_then(|roadmap| {
        let id = roadmap.current.milestone.clone()?;
        let milestone = roadmap.milestone(&id).ok()?;
        Some((id, milestone.status, incomplete_tasks(milestone)))
    });

    match milestone_status {
        Some((id, status, remaining)) if status != Status::Completed => HookDecision::Stop {
            allow: false,
            reason: format!(
                "milestone {} is {} with {} task(s) remaining; finish it or run `warden cache reset` to abort the build",
                id,
                status,
                remaining
            ),
        },
        Some(_) => {
            cache.build_active = false;
            let _ = cache.save(root);
            HookDecision::Stop {
                allow: true,
                reason: String::new(),
            }
        }
        None => {
            cache.build_active = false;
            let _ = cache.save(root);
            HookDecision::Stop {
                allow: true,
                reason: String::new(),
            }
        }
    }
}

fn incomplete_tasks(milestone: &warden_core::roadmap::MilestoneEntry) -> usize {
    milestone
        .tasks
        .iter()
        .filter(|t| t.status != Status::Completed)
        .count()
}
