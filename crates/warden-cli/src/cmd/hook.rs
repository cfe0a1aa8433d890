//! Dispatch a lifecycle hook handler over stdin and map its decision to the
//! process exit: allow exits 0, block prints the reason to stderr and
//! exits 2, Stop decisions answer with JSON on stdout.

use crate::hooks;
use clap::ValueEnum;
use std::io::Read;
use std::path::Path;
use warden_core::hook::HookInput;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HookName {
    Guardrail,
    PhaseGuard,
    PhaseTransition,
    SubagentOrder,
    StopGuard,
    RoadmapGuard,
    Log,
    Context,
    BuildTrigger,
}

pub fn run(root: &Path, name: HookName) -> anyhow::Result<()> {
    let mut text = String::new();
    if std::io::stdin().read_to_string(&mut text).is_err() {
        // Unreadable stdin never blocks the agent.
        std::process::exit(0);
    }
    let input = HookInput::parse(&text);
    tracing::info!(event = %input.hook_event_name, tool = %input.tool_name, "hook {:?}", name);

    let decision = match name {
        HookName::Guardrail => hooks::guardrail::handle(root, &input),
        HookName::PhaseGuard => hooks::phase_guard::handle(root, &input),
        HookName::PhaseTransition => hooks::transition::handle(root, &input),
        HookName::SubagentOrder => hooks::subagent_order::handle(root, &input),
        HookName::StopGuard => hooks::stop_guard::handle(root, &input),
        HookName::RoadmapGuard => hooks::roadmap_guard::handle(root, &input),
        HookName::Log => hooks::log::handle(root, &input),
        HookName::Context => hooks::context::handle(root, &input),
        HookName::BuildTrigger => hooks::trigger::handle(root, &input),
    };

    if let Some(out) = decision.stdout() {
        println!("{out}");
    }
    if let Some(reason) = decision.stderr() {
        eprintln!("{reason}");
    }
    std::process::exit(decision.exit_code());
}
