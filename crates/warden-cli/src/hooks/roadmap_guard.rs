//! Protects `roadmap.json` from hand edits that would corrupt it: the
//! resulting document must still parse against the roadmap schema.

use std::path::Path;
use warden_core::hook::{HookDecision, HookInput};
use warden_core::paths;
use warden_core::roadmap::Roadmap;

pub fn handle(root: &Path, input: &HookInput) -> HookDecision {
    if input.tool_name != "Write" && input.tool_name != "Edit" {
        return HookDecision::Allow;
    }
    let path = input.tool_input.file_path.replace('\\', "/");
    if !path.ends_with("/roadmap.json") && path != "roadmap.json" {
        return HookDecision::Allow;
    }

    let candidate = match input.tool_name.as_str() {
        "Write" => input.tool_input.content.clone(),
        _ => {
            if input.tool_input.old_string.is_empty() {
                return HookDecision::Allow;
            }
            let Ok(version) = paths::current_version(root) else {
                return HookDecision::Allow;
            };
            let Ok(current) = std::fs::read_to_string(paths::roadmap_path(root, &version)) else {
                return HookDecision::Allow;
            };
            if !current.contains(&input.tool_input.old_string) {
                // The edit will fail on its own; not ours to judge.
                return HookDecision::Allow;
            }
            current.replacen(&input.tool_input.old_string, &input.tool_input.new_string, 1)
        }
    };

    match serde_json::from_str::<Roadmap>(&candidate) {
        Ok(_) => HookDecision::Allow,
        Err(e) => HookDecision::Block(format!(
            "this change would corrupt roadmap.json ({e}); use `warden status set` instead"
        )),
    }
}
