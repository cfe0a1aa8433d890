//! Positional ID rewrite.
//!
//! After manual edits to `roadmap.json` (reordered phases, deleted tasks)
//! the ids can drift from their array positions. Reindexing rewrites every
//! phase, milestone and task id from its position and remaps `current`,
//! task dependencies and milestone `dependencies`/`parallel_with` through
//! the old-to-new mapping. Task ids are local to their milestone, so each
//! milestone's task renumbering only applies to its own tasks; two
//! milestones can both rename a `T002` without touching each other.
//! Criterion ids are stable references and are never touched.

use crate::ids;
use crate::roadmap::Roadmap;
use std::collections::BTreeMap;

/// One id change, old to new.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renumbering {
    pub old: String,
    pub new: String,
}

pub fn reindex(roadmap: &mut Roadmap) -> Vec<Renumbering> {
    let mut changes = Vec::new();
    // Phase and milestone ids are unique across the roadmap; task ids are
    // not, so their maps are kept per milestone (keyed by new milestone id).
    let mut structural: BTreeMap<String, String> = BTreeMap::new();
    let mut task_maps: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    let mut milestone_count = 0usize;

    for (pi, phase) in roadmap.phases.iter_mut().enumerate() {
        let new_id = ids::phase_id(pi);
        if phase.id != new_id {
            structural.insert(phase.id.clone(), new_id.clone());
            changes.push(Renumbering {
                old: phase.id.clone(),
                new: new_id.clone(),
            });
            phase.id = new_id;
        }
        for milestone in &mut phase.milestones {
            let new_id = ids::milestone_id(milestone_count);
            milestone_count += 1;
            if milestone.id != new_id {
                structural.insert(milestone.id.clone(), new_id.clone());
                changes.push(Renumbering {
                    old: milestone.id.clone(),
                    new: new_id.clone(),
                });
                milestone.id = new_id;
            }
            let mut tasks: BTreeMap<String, String> = BTreeMap::new();
            for (ti, task) in milestone.tasks.iter_mut().enumerate() {
                let new_id = ids::task_id(ti);
                if task.id != new_id {
                    tasks.insert(task.id.clone(), new_id.clone());
                    changes.push(Renumbering {
                        old: task.id.clone(),
                        new: new_id.clone(),
                    });
                    task.id = new_id;
                }
            }
            if !tasks.is_empty() {
                task_maps.insert(milestone.id.clone(), tasks);
            }
        }
    }

    for phase in &mut roadmap.phases {
        for milestone in &mut phase.milestones {
            remap(&mut milestone.dependencies, &structural);
            remap(&mut milestone.parallel_with, &structural);
            for task in &mut milestone.tasks {
                // Sibling task references first, then cross-milestone ones.
                if let Some(tasks) = task_maps.get(&milestone.id) {
                    remap(&mut task.dependencies, tasks);
                }
                remap(&mut task.dependencies, &structural);
            }
        }
    }

    remap_opt(&mut roadmap.current.phase, &structural);
    remap_opt(&mut roadmap.current.milestone, &structural);
    if let Some(milestone) = &roadmap.current.milestone {
        if let Some(tasks) = task_maps.get(milestone) {
            remap_opt(&mut roadmap.current.task, tasks);
        }
    }

    changes
}

fn remap(ids: &mut [String], mapping: &BTreeMap<String, String>) {
    for id in ids {
        if let Some(new) = mapping.get(id) {
            *id = new.clone();
        }
    }
}

fn remap_opt(id: &mut Option<String>, mapping: &BTreeMap<String, String>) {
    if let Some(id) = id {
        if let Some(new) = mapping.get(id) {
            *id = new.clone();
        }
    }
}
