use crate::output::{print_json, print_kv};
use anyhow::{bail, Context};
use clap::Subcommand;
use std::path::Path;
use warden_core::ids::{detect_target, Target};
use warden_core::resolve;
use warden_core::roadmap::Roadmap;
use warden_core::types::{CriterionStatus, Status};

#[derive(Subcommand)]
pub enum StatusSubcommand {
    /// Show project status, the current pointer, and summary counts
    Show,

    /// Update the status of a phase, milestone, task, or criterion
    Set {
        /// Target id: TNNN, MS-NNN, PHASE-NNN (or a bare number), AC-NNN,
        /// SC-NNN, project
        id: String,

        /// New status (not_started, in_progress, completed, blocked)
        #[arg(long, conflicts_with = "met")]
        status: Option<String>,

        /// For criteria: mark met (true) or unmet (false)
        #[arg(long)]
        met: Option<bool>,

        /// Owner of the criterion (task id for AC-, milestone id for SC-);
        /// defaults to the current task/milestone
        #[arg(long)]
        of: Option<String>,

        /// Skip the cascade resolver after the update
        #[arg(long)]
        no_cascade: bool,
    },
}

pub fn run(root: &Path, subcommand: StatusSubcommand, json: bool) -> anyhow::Result<()> {
    match subcommand {
        StatusSubcommand::Show => show(root, json),
        StatusSubcommand::Set {
            id,
            status,
            met,
            of,
            no_cascade,
        } => set(root, &id, status.as_deref(), met, of.as_deref(), no_cascade),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let roadmap = Roadmap::load(root).context("failed to load roadmap")?;

    if json {
        #[derive(serde::Serialize)]
        struct StatusOutput<'a> {
            project: &'a warden_core::roadmap::ProjectInfo,
            current: &'a warden_core::roadmap::Current,
            summary: &'a warden_core::roadmap::Summary,
        }
        return print_json(&StatusOutput {
            project: &roadmap.project,
            current: &roadmap.current,
            summary: &roadmap.summary,
        });
    }

    let dash = || "-".to_string();
    print_kv(&[
        ("project", roadmap.project.name.clone()),
        ("version", roadmap.project.version.clone()),
        ("status", roadmap.project.status.to_string()),
        ("phase", roadmap.current.phase.clone().unwrap_or_else(dash)),
        (
            "milestone",
            roadmap.current.milestone.clone().unwrap_or_else(dash),
        ),
        ("task", roadmap.current.task.clone().unwrap_or_else(dash)),
        (
            "tasks",
            format!(
                "{}/{} completed, {} pending",
                roadmap.summary.tasks.completed,
                roadmap.summary.tasks.total,
                roadmap.summary.tasks.pending
            ),
        ),
    ]);
    Ok(())
}

fn set(
    root: &Path,
    id: &str,
    status: Option<&str>,
    met: Option<bool>,
    of: Option<&str>,
    no_cascade: bool,
) -> anyhow::Result<()> {
    let mut roadmap = Roadmap::load(root).context("failed to load roadmap")?;
    let target = detect_target(id)?;

    match &target {
        Target::Acceptance(cid) | Target::Success(cid) => {
            let met = met.context("criteria updates require --met true|false")?;
            let status = if met {
                CriterionStatus::Met
            } else {
                CriterionStatus::Unmet
            };
            let owner = match (of, &target) {
                (Some(owner), _) => owner.to_string(),
                (None, Target::Acceptance(_)) => roadmap
                    .current
                    .task
                    .clone()
                    .context("no current task; pass --of <task-id>")?,
                (None, _) => roadmap
                    .current
                    .milestone
                    .clone()
                    .context("no current milestone; pass --of <milestone-id>")?,
            };
            roadmap.set_criterion_status(&owner, cid, status)?;
            println!("{cid} on {owner}: {status}");
        }
        _ => {
            let status: Status = status
                .context("use --status <not_started|in_progress|completed|blocked>")?
                .parse()?;
            match &target {
                Target::Project => roadmap.set_project_status(status),
                Target::Current => {
                    let task = roadmap
                        .current
                        .task
                        .clone()
                        .context("no current task to update")?;
                    roadmap.set_task_status(&task, status)?;
                }
                Target::Phase(pid) => roadmap.set_phase_status(pid, status)?,
                Target::Milestone(mid) => roadmap.set_milestone_status(mid, status)?,
                Target::Task(tid) => roadmap.set_task_status(tid, status)?,
                Target::Acceptance(_) | Target::Success(_) => {
                    bail!("criteria take --met, not --status")
                }
            }
            println!("{id}: {status}");
        }
    }

    if !no_cascade {
        for change in resolve::resolve(&mut roadmap) {
            eprintln!("resolved {}: {}", change.entity, change.message);
        }
    } else {
        roadmap.recompute_summary();
    }
    roadmap.save(root).context("failed to save roadmap")?;
    Ok(())
}
