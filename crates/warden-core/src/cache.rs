//! Session-scoped workflow state, persisted at `.warden/cache.json`.
//!
//! The cache survives across hook invocations within a session and tracks
//! which workflow phase is active, which guardrails are armed and where the
//! code-phase subagent sequence stands. A missing or corrupt file is treated
//! as an empty cache so a broken write never wedges the hooks.

use crate::error::Result;
use crate::io::atomic_write;
use crate::paths;
use crate::workflow::WorkflowPhase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cache {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub current_phase: Option<WorkflowPhase>,
    #[serde(default)]
    pub phases_completed: Vec<WorkflowPhase>,
    #[serde(default)]
    pub current_subagent: Option<String>,
    #[serde(default)]
    pub code_phase_position: usize,
    #[serde(default)]
    pub build_active: bool,
    #[serde(default)]
    pub engineer_task_logged: bool,
    #[serde(default)]
    pub guardrails: BTreeMap<String, bool>,
    /// Hook configuration stashed by `warden hooks off`, restored by `on`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stashed_hooks: Option<serde_json::Value>,
}

impl Cache {
    pub fn load(root: &Path) -> Self {
        let path = paths::cache_path(root);
        match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
            Err(_) => Cache::default(),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        atomic_write(&paths::cache_path(root), text.as_bytes())
    }

    /// Clear workflow state while keeping the session id.
    pub fn reset(&mut self) {
        let session_id = std::mem::take(&mut self.session_id);
        *self = Cache {
            session_id,
            ..Cache::default()
        };
    }

    /// Remove the cache file. Returns true if a file existed.
    pub fn delete(root: &Path) -> Result<bool> {
        let path = paths::cache_path(root);
        if path.exists() {
            std::fs::remove_file(&path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn guardrail_active(&self, subagent: &str) -> bool {
        self.guardrails.get(subagent).copied().unwrap_or(false)
    }

    pub fn set_guardrail(&mut self, subagent: &str, active: bool) {
        if active {
            self.guardrails.insert(subagent.to_string(), true);
        } else {
            self.guardrails.remove(subagent);
        }
    }
}
