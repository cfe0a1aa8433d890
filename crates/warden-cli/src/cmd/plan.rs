//! `phase add`, `milestone add`, `task add`, and `criteria add`.

use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use warden_core::io::ensure_dir;
use warden_core::paths;
use warden_core::roadmap::Roadmap;

#[derive(Subcommand)]
pub enum PhaseSubcommand {
    /// Add a phase to the roadmap
    Add {
        /// Explicit id (PHASE-NNN); default: next positional id
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum MilestoneSubcommand {
    /// Add a milestone to a phase
    Add {
        /// Owning phase (PHASE-NNN)
        #[arg(long)]
        phase: String,

        /// Explicit id (MS-NNN); default: next positional id
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        name: String,

        #[arg(long)]
        goal: Option<String>,

        /// Mark as runnable in parallel
        #[arg(long)]
        parallel: bool,

        /// Milestones this one runs in parallel with
        #[arg(long = "parallel-with", value_delimiter = ',')]
        parallel_with: Vec<String>,

        /// Milestones that must complete first
        #[arg(long = "depends", value_delimiter = ',')]
        dependencies: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Add a task to a milestone
    Add {
        /// Owning milestone (MS-NNN)
        #[arg(long)]
        milestone: String,

        /// Explicit id (TNNN); default: next positional id
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        description: String,

        #[arg(long)]
        priority: Option<String>,

        /// Subagents expected to work this task
        #[arg(long = "subagents", value_delimiter = ',')]
        subagents: Vec<String>,

        /// Tasks (or milestones) that must complete first
        #[arg(long = "depends", value_delimiter = ',')]
        dependencies: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum CriteriaSubcommand {
    /// Add an acceptance (AC-, with --task) or success (SC-) criterion
    Add {
        /// Owning milestone (MS-NNN)
        #[arg(long)]
        milestone: String,

        /// Owning task for acceptance criteria (TNNN)
        #[arg(long)]
        task: Option<String>,

        /// Explicit id (AC-NNN / SC-NNN); default: next positional id
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        description: String,
    },
}

pub fn run_phase(root: &Path, subcommand: PhaseSubcommand, json: bool) -> anyhow::Result<()> {
    let PhaseSubcommand::Add { id, name } = subcommand;
    let mut roadmap = Roadmap::load(root).context("failed to load roadmap")?;
    let id = roadmap.add_phase(id.as_deref(), &name)?;
    roadmap.save(root)?;
    emit(&id, json)
}

pub fn run_milestone(
    root: &Path,
    subcommand: MilestoneSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let MilestoneSubcommand::Add {
        phase,
        id,
        name,
        goal,
        parallel,
        parallel_with,
        dependencies,
    } = subcommand;
    let mut roadmap = Roadmap::load(root).context("failed to load roadmap")?;
    let id = roadmap.add_milestone(
        &phase,
        id.as_deref(),
        &name,
        goal.as_deref(),
        parallel,
        parallel_with,
        dependencies,
    )?;
    roadmap.save(root)?;

    // Scaffold the milestone workspace alongside the roadmap entry.
    let version = paths::current_version(root)?;
    let folder = paths::milestone_folder_name(&id, &name);
    let workspace = paths::milestone_workspace(root, &version, &folder);
    for subdir in paths::MILESTONE_SUBDIRS {
        ensure_dir(&workspace.join(subdir))?;
    }

    emit(&id, json)
}

pub fn run_task(root: &Path, subcommand: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    let TaskSubcommand::Add {
        milestone,
        id,
        description,
        priority,
        subagents,
        dependencies,
    } = subcommand;
    let mut roadmap = Roadmap::load(root).context("failed to load roadmap")?;
    let id = roadmap.add_task(
        &milestone,
        id.as_deref(),
        &description,
        priority.as_deref(),
        subagents,
        dependencies,
    )?;
    roadmap.save(root)?;
    emit(&id, json)
}

pub fn run_criteria(root: &Path, subcommand: CriteriaSubcommand, json: bool) -> anyhow::Result<()> {
    let CriteriaSubcommand::Add {
        milestone,
        task,
        id,
        description,
    } = subcommand;
    let mut roadmap = Roadmap::load(root).context("failed to load roadmap")?;
    let id = match task {
        Some(task) => roadmap.add_acceptance_criterion(&task, id.as_deref(), &description)?,
        None => roadmap.add_success_criterion(&milestone, id.as_deref(), &description)?,
    };
    roadmap.save(root)?;
    emit(&id, json)
}

fn emit(id: &str, json: bool) -> anyhow::Result<()> {
    if json {
        crate::output::print_json(&serde_json::json!({ "id": id }))
    } else {
        println!("{id}");
        Ok(())
    }
}
