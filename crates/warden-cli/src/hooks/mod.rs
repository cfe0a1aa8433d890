//! Lifecycle hook handlers.
//!
//! Each handler takes the parsed stdin event and returns a
//! [`warden_core::hook::HookDecision`]. Handlers fail open: infrastructure
//! problems (missing roadmap, unreadable cache) allow the tool call rather
//! than wedge the agent session.

pub mod context;
pub mod guardrail;
pub mod log;
pub mod phase_guard;
pub mod roadmap_guard;
pub mod stop_guard;
pub mod subagent_order;
pub mod transition;
pub mod trigger;

use std::path::Path;
use warden_core::guardrail::PathContext;
use warden_core::paths;
use warden_core::roadmap::Roadmap;

/// Build the path-rule context from the roadmap's current milestone.
/// Returns None when there is no active milestone to scope paths to.
pub(crate) fn path_context(root: &Path, session_id: &str) -> Option<PathContext> {
    let version = paths::current_version(root).ok()?;
    let roadmap = Roadmap::load(root).ok()?;
    let milestone_id = roadmap.current.milestone.clone()?;
    let milestone = roadmap.milestone(&milestone_id).ok()?;
    let folder = paths::milestone_folder_name(&milestone.id, &milestone.name);
    Some(PathContext {
        version,
        milestone_folder: folder,
        date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
        session_id: session_id.to_string(),
    })
}
