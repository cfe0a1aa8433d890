//! The release roadmap document and its guarded mutations.
//!
//! The roadmap lives at `project/<version>/release-plan/roadmap.json` and
//! holds the full phase -> milestone -> task hierarchy together with the
//! current-work pointer and aggregate counts. All writes go through
//! [`Roadmap::save`] so the file is always replaced atomically.

use crate::error::{Result, WardenError};
use crate::ids;
use crate::io::atomic_write;
use crate::paths;
use crate::types::{CriterionStatus, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SCHEMA_VERSION: &str = "2.0";

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    pub project: ProjectInfo,
    #[serde(default)]
    pub current: Current,
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub phases: Vec<PhaseEntry>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_release: Option<String>,
    #[serde(default)]
    pub status: Status,
}

/// Pointer at the first non-completed item at each level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Current {
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub milestone: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub phases: Counts,
    #[serde(default)]
    pub milestones: Counts,
    #[serde(default)]
    pub tasks: Counts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub milestones: Vec<MilestoneEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parallel_with: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
    #[serde(default)]
    pub success_criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEntry {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subagents: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub acceptance_criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub status: CriterionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub last_updated: DateTime<Utc>,
    pub schema_version: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            last_updated: Utc::now(),
            schema_version: SCHEMA_VERSION.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

impl Roadmap {
    pub fn new(name: &str, version: &str, target_release: Option<&str>) -> Self {
        Self {
            project: ProjectInfo {
                name: name.to_string(),
                version: version.to_string(),
                target_release: target_release.map(str::to_string),
                status: Status::NotStarted,
            },
            current: Current::default(),
            summary: Summary::default(),
            phases: Vec::new(),
            metadata: Metadata::default(),
        }
    }

    /// Load the roadmap for the current version recorded in product.json.
    pub fn load(root: &Path) -> Result<Self> {
        let version = paths::current_version(root)?;
        Self::load_from(&paths::roadmap_path(root, &version))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WardenError::RoadmapNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&mut self, root: &Path) -> Result<()> {
        let version = paths::current_version(root)?;
        self.save_to(&paths::roadmap_path(root, &version))
    }

    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        self.metadata.last_updated = Utc::now();
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        atomic_write(path, text.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    pub fn phase_index(&self, id: &str) -> Result<usize> {
        self.phases
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| WardenError::PhaseNotFound(id.to_string()))
    }

    /// Locate a milestone anywhere in the hierarchy, returning (phase, milestone) indices.
    pub fn milestone_index(&self, id: &str) -> Result<(usize, usize)> {
        for (pi, phase) in self.phases.iter().enumerate() {
            if let Some(mi) = phase.milestones.iter().position(|m| m.id == id) {
                return Ok((pi, mi));
            }
        }
        Err(WardenError::MilestoneNotFound(id.to_string()))
    }

    pub fn task_index(&self, id: &str) -> Result<(usize, usize, usize)> {
        for (pi, phase) in self.phases.iter().enumerate() {
            for (mi, milestone) in phase.milestones.iter().enumerate() {
                if let Some(ti) = milestone.tasks.iter().position(|t| t.id == id) {
                    return Ok((pi, mi, ti));
                }
            }
        }
        Err(WardenError::TaskNotFound(id.to_string()))
    }

    pub fn milestone(&self, id: &str) -> Result<&MilestoneEntry> {
        let (pi, mi) = self.milestone_index(id)?;
        Ok(&self.phases[pi].milestones[mi])
    }

    pub fn task(&self, id: &str) -> Result<&TaskEntry> {
        let (pi, mi, ti) = self.task_index(id)?;
        Ok(&self.phases[pi].milestones[mi].tasks[ti])
    }

    fn milestone_exists(&self, id: &str) -> bool {
        self.milestone_index(id).is_ok()
    }

    fn task_exists(&self, id: &str) -> bool {
        self.task_index(id).is_ok()
    }

    // -----------------------------------------------------------------------
    // Additions
    // -----------------------------------------------------------------------

    /// Add a phase. With no explicit id, one is generated from the position.
    pub fn add_phase(&mut self, id: Option<&str>, name: &str) -> Result<String> {
        let id = match id {
            Some(id) => {
                ids::validate_phase_id(id)?;
                id.to_string()
            }
            None => ids::phase_id(self.phases.len()),
        };
        if self.phases.iter().any(|p| p.id == id) {
            return Err(WardenError::PhaseExists(id));
        }
        self.phases.push(PhaseEntry {
            id: id.clone(),
            name: name.to_string(),
            status: Status::NotStarted,
            milestones: Vec::new(),
        });
        self.recompute_summary();
        Ok(id)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_milestone(
        &mut self,
        phase_id: &str,
        id: Option<&str>,
        name: &str,
        goal: Option<&str>,
        parallel: bool,
        parallel_with: Vec<String>,
        dependencies: Vec<String>,
    ) -> Result<String> {
        ids::validate_phase_id(phase_id)?;
        for dep in dependencies.iter().chain(parallel_with.iter()) {
            ids::validate_milestone_id(dep)?;
        }
        let missing: Vec<String> = dependencies
            .iter()
            .chain(parallel_with.iter())
            .filter(|d| !self.milestone_exists(d))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(WardenError::InvalidReference {
                field: "dependencies",
                ids: missing.join(", "),
            });
        }
        let id = match id {
            Some(id) => {
                ids::validate_milestone_id(id)?;
                id.to_string()
            }
            None => {
                let total: usize = self.phases.iter().map(|p| p.milestones.len()).sum();
                ids::milestone_id(total)
            }
        };
        if self.milestone_exists(&id) {
            return Err(WardenError::MilestoneExists(id));
        }
        let pi = self.phase_index(phase_id)?;
        self.phases[pi].milestones.push(MilestoneEntry {
            id: id.clone(),
            name: name.to_string(),
            goal: goal.map(str::to_string),
            parallel,
            parallel_with,
            dependencies,
            status: Status::NotStarted,
            tasks: Vec::new(),
            success_criteria: Vec::new(),
        });
        self.recompute_summary();
        Ok(id)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_task(
        &mut self,
        milestone_id: &str,
        id: Option<&str>,
        description: &str,
        priority: Option<&str>,
        subagents: Vec<String>,
        dependencies: Vec<String>,
    ) -> Result<String> {
        ids::validate_milestone_id(milestone_id)?;
        let missing: Vec<String> = dependencies
            .iter()
            .filter(|d| !self.task_exists(d) && !self.milestone_exists(d))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(WardenError::InvalidReference {
                field: "dependencies",
                ids: missing.join(", "),
            });
        }
        let (pi, mi) = self.milestone_index(milestone_id)?;
        // Task ids are local to the milestone.
        let id = match id {
            Some(id) => {
                ids::validate_task_id(id)?;
                id.to_string()
            }
            None => ids::task_id(self.phases[pi].milestones[mi].tasks.len()),
        };
        if self.phases[pi].milestones[mi].tasks.iter().any(|t| t.id == id) {
            return Err(WardenError::TaskExists(id));
        }
        self.phases[pi].milestones[mi].tasks.push(TaskEntry {
            id: id.clone(),
            description: description.to_string(),
            priority: priority.map(str::to_string),
            subagents,
            dependencies,
            status: Status::NotStarted,
            acceptance_criteria: Vec::new(),
        });
        self.recompute_summary();
        Ok(id)
    }

    pub fn add_acceptance_criterion(
        &mut self,
        task_id: &str,
        id: Option<&str>,
        description: &str,
    ) -> Result<String> {
        ids::validate_task_id(task_id)?;
        let (pi, mi, ti) = self.task_index(task_id)?;
        let task = &mut self.phases[pi].milestones[mi].tasks[ti];
        let id = match id {
            Some(id) => {
                ids::validate_ac_id(id)?;
                id.to_string()
            }
            None => format!("AC-{:03}", task.acceptance_criteria.len() + 1),
        };
        if task.acceptance_criteria.iter().any(|c| c.id == id) {
            return Err(WardenError::CriterionExists(id));
        }
        task.acceptance_criteria.push(Criterion {
            id: id.clone(),
            description: description.to_string(),
            status: CriterionStatus::Unmet,
        });
        Ok(id)
    }

    pub fn add_success_criterion(
        &mut self,
        milestone_id: &str,
        id: Option<&str>,
        description: &str,
    ) -> Result<String> {
        ids::validate_milestone_id(milestone_id)?;
        let (pi, mi) = self.milestone_index(milestone_id)?;
        let milestone = &mut self.phases[pi].milestones[mi];
        let id = match id {
            Some(id) => {
                ids::validate_sc_id(id)?;
                id.to_string()
            }
            None => format!("SC-{:03}", milestone.success_criteria.len() + 1),
        };
        if milestone.success_criteria.iter().any(|c| c.id == id) {
            return Err(WardenError::CriterionExists(id));
        }
        milestone.success_criteria.push(Criterion {
            id: id.clone(),
            description: description.to_string(),
            status: CriterionStatus::Unmet,
        });
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Status mutation
    // -----------------------------------------------------------------------

    /// Set a task's status, enforcing dependency and criteria gates:
    /// a task cannot start while its dependencies are incomplete, and
    /// cannot complete while acceptance criteria are unmet.
    pub fn set_task_status(&mut self, task_id: &str, status: Status) -> Result<()> {
        let (pi, mi, ti) = self.task_index(task_id)?;
        if status == Status::InProgress {
            let deps = self.incomplete_dependencies(pi, mi, ti);
            if !deps.is_empty() {
                return Err(WardenError::DependenciesIncomplete {
                    id: task_id.to_string(),
                    deps: deps.join(", "),
                });
            }
        }
        if status == Status::Completed {
            let unmet = self.unmet_acs(pi, mi, ti);
            if !unmet.is_empty() {
                return Err(WardenError::CriteriaUnmet {
                    id: task_id.to_string(),
                    unmet: unmet.join(", "),
                });
            }
        }
        self.phases[pi].milestones[mi].tasks[ti].status = status;
        self.recompute_summary();
        Ok(())
    }

    pub fn set_milestone_status(&mut self, milestone_id: &str, status: Status) -> Result<()> {
        let (pi, mi) = self.milestone_index(milestone_id)?;
        self.phases[pi].milestones[mi].status = status;
        self.recompute_summary();
        Ok(())
    }

    pub fn set_phase_status(&mut self, phase_id: &str, status: Status) -> Result<()> {
        let pi = self.phase_index(phase_id)?;
        self.phases[pi].status = status;
        self.recompute_summary();
        Ok(())
    }

    pub fn set_project_status(&mut self, status: Status) {
        self.project.status = status;
    }

    /// Mark an acceptance (AC-) or success (SC-) criterion. The criterion id
    /// is resolved within the named task or milestone.
    pub fn set_criterion_status(
        &mut self,
        owner_id: &str,
        criterion_id: &str,
        status: CriterionStatus,
    ) -> Result<()> {
        if ids::validate_sc_id(criterion_id).is_ok() {
            let (pi, mi) = self.milestone_index(owner_id)?;
            let milestone = &mut self.phases[pi].milestones[mi];
            let c = milestone
                .success_criteria
                .iter_mut()
                .find(|c| c.id == criterion_id)
                .ok_or_else(|| WardenError::CriterionNotFound(criterion_id.to_string()))?;
            c.status = status;
            return Ok(());
        }
        ids::validate_ac_id(criterion_id)?;
        let (pi, mi, ti) = self.task_index(owner_id)?;
        let task = &mut self.phases[pi].milestones[mi].tasks[ti];
        let c = task
            .acceptance_criteria
            .iter_mut()
            .find(|c| c.id == criterion_id)
            .ok_or_else(|| WardenError::CriterionNotFound(criterion_id.to_string()))?;
        c.status = status;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Gates and aggregates
    // -----------------------------------------------------------------------

    fn unmet_acs(&self, pi: usize, mi: usize, ti: usize) -> Vec<String> {
        self.phases[pi].milestones[mi].tasks[ti]
            .acceptance_criteria
            .iter()
            .filter(|c| c.status != CriterionStatus::Met)
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn unmet_scs(&self, milestone: &MilestoneEntry) -> Vec<String> {
        milestone
            .success_criteria
            .iter()
            .filter(|c| c.status != CriterionStatus::Met)
            .map(|c| c.id.clone())
            .collect()
    }

    /// Milestone dependencies are checked first, then sibling task
    /// dependencies within the same milestone.
    fn incomplete_dependencies(&self, pi: usize, mi: usize, ti: usize) -> Vec<String> {
        let milestone = &self.phases[pi].milestones[mi];
        let task = &milestone.tasks[ti];
        let mut incomplete = Vec::new();
        for dep in &milestone.dependencies {
            if let Ok(m) = self.milestone(dep) {
                if m.status != Status::Completed {
                    incomplete.push(dep.clone());
                }
            }
        }
        for dep in &task.dependencies {
            if let Some(t) = milestone.tasks.iter().find(|t| &t.id == dep) {
                if t.status != Status::Completed {
                    incomplete.push(dep.clone());
                }
            } else if let Ok(m) = self.milestone(dep) {
                if m.status != Status::Completed {
                    incomplete.push(dep.clone());
                }
            }
        }
        incomplete
    }

    pub fn recompute_summary(&mut self) {
        let mut phases = Counts::default();
        let mut milestones = Counts::default();
        let mut tasks = Counts::default();
        for phase in &self.phases {
            phases.total += 1;
            match phase.status {
                Status::Completed => phases.completed += 1,
                _ => phases.pending += 1,
            }
            for milestone in &phase.milestones {
                milestones.total += 1;
                match milestone.status {
                    Status::Completed => milestones.completed += 1,
                    _ => milestones.pending += 1,
                }
                for task in &milestone.tasks {
                    tasks.total += 1;
                    match task.status {
                        Status::Completed => tasks.completed += 1,
                        _ => tasks.pending += 1,
                    }
                }
            }
        }
        self.summary = Summary {
            phases,
            milestones,
            tasks,
        };
    }
}

// ---------------------------------------------------------------------------
