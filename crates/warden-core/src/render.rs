//! Markdown rendering of the roadmap, written next to the JSON document.

use crate::error::Result;
use crate::io::atomic_write;
use crate::paths;
use crate::roadmap::Roadmap;
use crate::types::{CriterionStatus, Status};
use std::fmt::Write as _;
use std::path::Path;

fn checkbox(status: Status) -> &'static str {
    match status {
        Status::Completed => "[x]",
        _ => "[ ]",
    }
}

fn marker(status: Status) -> &'static str {
    match status {
        Status::InProgress => " (in progress)",
        Status::Blocked => " (blocked)",
        _ => "",
    }
}

pub fn to_markdown(roadmap: &Roadmap) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# {} {}\n",
        roadmap.project.name, roadmap.project.version
    );
    let _ = writeln!(
        out,
        "Status: {} | Tasks: {}/{} completed",
        roadmap.project.status, roadmap.summary.tasks.completed, roadmap.summary.tasks.total
    );
    if let Some(task) = &roadmap.current.task {
        let _ = writeln!(out, "Current: {task}");
    }
    for phase in &roadmap.phases {
        let _ = writeln!(
            out,
            "\n## {} {} {}{}",
            checkbox(phase.status),
            phase.id,
            phase.name,
            marker(phase.status)
        );
        for milestone in &phase.milestones {
            let _ = writeln!(
                out,
                "\n### {} {} {}{}",
                checkbox(milestone.status),
                milestone.id,
                milestone.name,
                marker(milestone.status)
            );
            if let Some(goal) = &milestone.goal {
                let _ = writeln!(out, "\n> {goal}");
            }
            if !milestone.tasks.is_empty() {
                let _ = writeln!(out);
            }
            for task in &milestone.tasks {
                let _ = writeln!(
                    out,
                    "- {} **{}** {}{}",
                    checkbox(task.status),
                    task.id,
                    task.description,
                    marker(task.status)
                );
                for ac in &task.acceptance_criteria {
                    let mark = if ac.status == CriterionStatus::Met {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    let _ = writeln!(out, "  - {} {} {}", mark, ac.id, ac.description);
                }
            }
            if !milestone.success_criteria.is_empty() {
                let _ = writeln!(out, "\nSuccess criteria:");
                for sc in &milestone.success_criteria {
                    let mark = if sc.status == CriterionStatus::Met {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    let _ = writeln!(out, "- {} {} {}", mark, sc.id, sc.description);
                }
            }
        }
    }
    out
}

/// Render the roadmap and write `roadmap.md` beside the JSON document.
pub fn write_markdown(root: &Path, roadmap: &Roadmap) -> Result<()> {
    let version = paths::current_version(root)?;
    let text = to_markdown(roadmap);
    atomic_write(&paths::roadmap_md_path(root, &version), text.as_bytes())
}
