//! Blocks writes and commands that belong to a later workflow phase.

use std::path::Path;
use warden_core::cache::Cache;
use warden_core::config::Config;
use warden_core::hook::{HookDecision, HookInput};
use warden_core::workflow::WorkflowPhase;

const WRITE_TOOLS: &[&str] = &["Write", "Edit", "MultiEdit", "NotebookEdit"];

pub fn handle(root: &Path, input: &HookInput) -> HookDecision {
    let cache = Cache::load(root);
    let Some(phase) = cache.current_phase else {
        return HookDecision::Allow;
    };

    let is_write = WRITE_TOOLS.contains(&input.tool_name.as_str());
    let path = input.tool_input.file_path.replace('\\', "/");
    let is_commit = input.tool_name == "Bash" && input.tool_input.command.contains("git commit");

    let config = Config::load_or_default(root).unwrap_or_default();
    let code_file = is_write && config.is_code_file(&path);
    let research_file = is_write && path.contains("/research/");
    let plan_file = is_write && path.contains("/plans/");

    let blocked = match phase {
        WorkflowPhase::Explore => code_file || research_file || plan_file,
        WorkflowPhase::Research => code_file || plan_file,
        WorkflowPhase::Plan => code_file || is_commit,
        WorkflowPhase::Code => is_commit,
        WorkflowPhase::Commit => false,
    };

    if blocked {
        let what = if is_commit {
            "git commit".to_string()
        } else {
            format!("writing {}", input.tool_input.file_path)
        };
        return HookDecision::Block(format!(
            "{} is not allowed during the {} phase",
            what, phase
        ));
    }
    HookDecision::Allow
}
