use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn warden(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("warden").unwrap();
    cmd.current_dir(dir.path()).env("WARDEN_ROOT", dir.path());
    cmd
}

fn init_project(dir: &TempDir) {
    warden(dir)
        .args(["init", "--name", "demo"])
        .assert()
        .success();
}

/// init + one phase / milestone / task with an acceptance criterion.
fn seed_plan(dir: &TempDir) {
    init_project(dir);
    warden(dir)
        .args(["phase", "add", "--name", "Foundation"])
        .assert()
        .success();
    warden(dir)
        .args(["milestone", "add", "--phase", "PHASE-001", "--name", "Core types"])
        .assert()
        .success();
    warden(dir)
        .args(["task", "add", "--milestone", "MS-001", "--description", "Define enums"])
        .assert()
        .success();
    warden(dir)
        .args([
            "criteria", "add", "--milestone", "MS-001", "--task", "T001",
            "--description", "round-trips",
        ])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// warden init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_project_tree() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    assert!(dir.path().join("project/product.json").exists());
    assert!(dir.path().join("project/0.1.0/specs/prd.md").exists());
    assert!(dir
        .path()
        .join("project/0.1.0/release-plan/roadmap.json")
        .exists());
    assert!(dir
        .path()
        .join("project/0.1.0/release-plan/overview.md")
        .exists());
    assert!(dir.path().join("project/0.1.0/phases/milestones").is_dir());
    assert!(dir.path().join(".warden/config.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let before =
        std::fs::read_to_string(dir.path().join("project/product.json")).unwrap();
    warden(&dir)
        .args(["init", "--name", "other"])
        .assert()
        .success();
    let after = std::fs::read_to_string(dir.path().join("project/product.json")).unwrap();
    assert_eq!(before, after);
}

// ---------------------------------------------------------------------------
// roadmap building and status
// ---------------------------------------------------------------------------

#[test]
fn plan_commands_assign_positional_ids() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["status", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""total": 1"#));
}

#[test]
fn milestone_add_scaffolds_workspace() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    let workspace = dir
        .path()
        .join("project/0.1.0/phases/milestones/MS-001_core-types");
    assert!(workspace.join("decisions").is_dir());
    assert!(workspace.join("plans").is_dir());
    assert!(workspace.join("codebase-status").is_dir());
}

#[test]
fn task_cannot_complete_with_unmet_criteria() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["status", "set", "T001", "--status", "completed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("AC-001"));
}

#[test]
fn completing_everything_cascades_to_the_phase() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["status", "set", "T001", "--status", "in_progress"])
        .assert()
        .success();
    warden(&dir)
        .args(["status", "set", "AC-001", "--met", "true", "--of", "T001"])
        .assert()
        .success();
    warden(&dir)
        .args(["status", "set", "T001", "--status", "completed"])
        .assert()
        .success();

    // The cascade completed the milestone and phase, so nothing is pending.
    warden(&dir)
        .args(["status", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""pending": 0"#));
}

#[test]
fn status_set_rejects_unknown_ids() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["status", "set", "T999", "--status", "in_progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("T999"));
}

#[test]
fn render_writes_checkbox_markdown() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir).arg("render").assert().success();
    let md =
        std::fs::read_to_string(dir.path().join("project/0.1.0/release-plan/roadmap.md"))
            .unwrap();
    assert!(md.contains("- [ ] **T001** Define enums"));
}

#[test]
fn resolve_reports_pointer_movement() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("current"));
}

// ---------------------------------------------------------------------------
// hooks
// ---------------------------------------------------------------------------

fn hook_input(event: &str, tool: &str, tool_input: serde_json::Value) -> String {
    serde_json::json!({
        "hook_event_name": event,
        "session_id": "s1",
        "tool_name": tool,
        "tool_input": tool_input,
    })
    .to_string()
}

#[test]
fn guardrail_arms_on_task_and_blocks_markdown() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Task",
            serde_json::json!({"subagent_type": "fullstack-developer"}),
        ))
        .assert()
        .success();

    // Clear the engineer task-log gate so the path rule is what fires.
    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Skill",
            serde_json::json!({"skill": "log:task", "args": "T001 in_progress"}),
        ))
        .assert()
        .success();

    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Write",
            serde_json::json!({"file_path": "docs/notes.md", "content": "x"}),
        ))
        .assert()
        .code(2)
        .stderr(predicate::str::contains(".md"));

    // README.md is the exception.
    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Write",
            serde_json::json!({"file_path": "README.md", "content": "x"}),
        ))
        .assert()
        .success();
}

#[test]
fn guardrail_disarms_on_subagent_stop() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Task",
            serde_json::json!({"subagent_type": "version-manager"}),
        ))
        .assert()
        .success();
    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Bash",
            serde_json::json!({"command": "git push origin main"}),
        ))
        .assert()
        .code(2);

    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input("SubagentStop", "", serde_json::json!({})))
        .assert()
        .success();
    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Bash",
            serde_json::json!({"command": "git push origin main"}),
        ))
        .assert()
        .success();
}

#[test]
fn engineer_must_log_task_before_other_tools() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Task",
            serde_json::json!({"subagent_type": "test-engineer"}),
        ))
        .assert()
        .success();

    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Bash",
            serde_json::json!({"command": "ls"}),
        ))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("log:task"));

    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Skill",
            serde_json::json!({"skill": "log:task", "args": "T001 in_progress"}),
        ))
        .assert()
        .success();

    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Bash",
            serde_json::json!({"command": "ls"}),
        ))
        .assert()
        .success();
}

#[test]
fn build_trigger_then_phase_transition_enforces_order() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["hook", "build-trigger"])
        .write_stdin(
            serde_json::json!({
                "hook_event_name": "UserPromptSubmit",
                "session_id": "s1",
                "prompt": "/build MS-001",
            })
            .to_string(),
        )
        .assert()
        .success();

    warden(&dir)
        .args(["hook", "phase-transition"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Skill",
            serde_json::json!({"skill": "phase:explore"}),
        ))
        .assert()
        .success();

    // Skipping from explore straight to code is rejected.
    warden(&dir)
        .args(["hook", "phase-transition"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Skill",
            serde_json::json!({"skill": "phase:code"}),
        ))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("research"));

    warden(&dir)
        .args(["hook", "phase-transition"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Skill",
            serde_json::json!({"skill": "phase:research"}),
        ))
        .assert()
        .success();
}

#[test]
fn subagent_order_enforces_phase_allowlist() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["hook", "build-trigger"])
        .write_stdin(
            serde_json::json!({
                "hook_event_name": "UserPromptSubmit",
                "prompt": "/build",
            })
            .to_string(),
        )
        .assert()
        .success();
    warden(&dir)
        .args(["hook", "phase-transition"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Skill",
            serde_json::json!({"skill": "phase:explore"}),
        ))
        .assert()
        .success();

    warden(&dir)
        .args(["hook", "subagent-order"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Task",
            serde_json::json!({"subagent_type": "codebase-explorer"}),
        ))
        .assert()
        .success();

    warden(&dir)
        .args(["hook", "subagent-order"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Task",
            serde_json::json!({"subagent_type": "code-reviewer"}),
        ))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("explore"));

    // Unknown subagents pass through.
    warden(&dir)
        .args(["hook", "subagent-order"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Task",
            serde_json::json!({"subagent_type": "mystery-agent"}),
        ))
        .assert()
        .success();
}

#[test]
fn stop_guard_blocks_while_milestone_open() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    // Establish the current pointer, then arm the build.
    warden(&dir).arg("resolve").assert().success();
    warden(&dir)
        .args(["hook", "build-trigger"])
        .write_stdin(
            serde_json::json!({
                "hook_event_name": "UserPromptSubmit",
                "prompt": "/implement",
            })
            .to_string(),
        )
        .assert()
        .success();

    warden(&dir)
        .args(["hook", "stop-guard"])
        .write_stdin(hook_input("Stop", "", serde_json::json!({})))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""decision":"block""#));
}

#[test]
fn stop_guard_allows_when_build_inactive() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["hook", "stop-guard"])
        .write_stdin(hook_input("Stop", "", serde_json::json!({})))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""continue": true"#));
}

#[test]
fn roadmap_guard_blocks_corrupting_writes() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["hook", "roadmap-guard"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Write",
            serde_json::json!({
                "file_path": "project/0.1.0/release-plan/roadmap.json",
                "content": "{ definitely broken",
            }),
        ))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("warden status set"));

    // Writes elsewhere are none of this hook's business.
    warden(&dir)
        .args(["hook", "roadmap-guard"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Write",
            serde_json::json!({"file_path": "src/lib.rs", "content": "fn main() {}"}),
        ))
        .assert()
        .success();
}

#[test]
fn log_skill_updates_and_reports_context() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["hook", "log"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Skill",
            serde_json::json!({"skill": "log:task", "args": "T001 in_progress"}),
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("additionalContext"));

    warden(&dir)
        .args(["hook", "log"])
        .write_stdin(hook_input(
            "PreToolUse",
            "Skill",
            serde_json::json!({"skill": "log:task", "args": "T001"}),
        ))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("T001 in_progress"));
}

#[test]
fn context_hook_summarizes_the_roadmap() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["hook", "context"])
        .write_stdin(
            serde_json::json!({
                "hook_event_name": "SessionStart",
                "session_id": "s1",
            })
            .to_string(),
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"));
}

#[test]
fn malformed_hook_input_is_ignored() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["hook", "guardrail"])
        .write_stdin("this is not json")
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// cache and hooks toggling
// ---------------------------------------------------------------------------

#[test]
fn cache_reset_and_delete() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    warden(&dir)
        .args(["cache", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cache reset"));
    warden(&dir)
        .args(["cache", "delete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cache deleted"));
    warden(&dir)
        .args(["cache", "delete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no cache file"));
}

#[test]
fn hooks_off_stashes_and_on_restores() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    let settings = dir.path().join(".claude/settings.local.json");
    std::fs::create_dir_all(settings.parent().unwrap()).unwrap();
    std::fs::write(
        &settings,
        r#"{"hooks": {"PreToolUse": [{"command": "warden hook guardrail"}]}, "other": 1}"#,
    )
    .unwrap();

    warden(&dir).args(["hooks", "off"]).assert().success();
    let text = std::fs::read_to_string(&settings).unwrap();
    assert!(!text.contains("hooks"));
    assert!(text.contains("other"));

    warden(&dir).args(["hooks", "on"]).assert().success();
    let text = std::fs::read_to_string(&settings).unwrap();
    assert!(text.contains("guardrail"));
}

#[test]
fn reindex_renumbers_after_manual_edits() {
    let dir = TempDir::new().unwrap();
    seed_plan(&dir);

    // Hand-edit the task id out of position.
    let path = dir.path().join("project/0.1.0/release-plan/roadmap.json");
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, text.replace(r#""T001""#, r#""T007""#)).unwrap();

    warden(&dir)
        .arg("reindex")
        .assert()
        .success()
        .stdout(predicate::str::contains("T007 -> T001"));
}
