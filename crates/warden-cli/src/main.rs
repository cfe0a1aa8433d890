mod cmd;
mod hooks;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    cache::CacheSubcommand, hook::HookName, plan::CriteriaSubcommand, plan::MilestoneSubcommand,
    plan::PhaseSubcommand, plan::TaskSubcommand, status::StatusSubcommand,
    toggle::HooksSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "warden",
    about = "Roadmap tracking, guardrails, and lifecycle hooks for AI coding agents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from project/ or .git/)
    #[arg(long, global = true, env = "WARDEN_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold the project layout, roadmap, and configuration
    #[command(disable_version_flag = true)]
    Init {
        /// Project name (default: the root directory name)
        #[arg(long)]
        name: Option<String>,

        /// Initial version
        #[arg(long, default_value = "0.1.0")]
        version: String,
    },

    /// Show or update roadmap status
    Status {
        #[command(subcommand)]
        subcommand: StatusSubcommand,
    },

    /// Manage roadmap phases
    Phase {
        #[command(subcommand)]
        subcommand: PhaseSubcommand,
    },

    /// Manage milestones
    Milestone {
        #[command(subcommand)]
        subcommand: MilestoneSubcommand,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Manage acceptance and success criteria
    Criteria {
        #[command(subcommand)]
        subcommand: CriteriaSubcommand,
    },

    /// Run the cascade resolver once and print what changed
    Resolve,

    /// Rewrite phase/milestone/task ids from their positions
    Reindex,

    /// Render roadmap.md from roadmap.json
    Render,

    /// Manage the workflow cache
    Cache {
        #[command(subcommand)]
        subcommand: CacheSubcommand,
    },

    /// Disable or restore agent hooks in the settings file
    Hooks {
        #[command(subcommand)]
        subcommand: HooksSubcommand,
    },

    /// Run a lifecycle hook handler over stdin
    Hook {
        #[arg(value_enum)]
        name: HookName,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Hook { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { name, version } => cmd::init::run(&root, name.as_deref(), &version),
        Commands::Status { subcommand } => cmd::status::run(&root, subcommand, cli.json),
        Commands::Phase { subcommand } => cmd::plan::run_phase(&root, subcommand, cli.json),
        Commands::Milestone { subcommand } => cmd::plan::run_milestone(&root, subcommand, cli.json),
        Commands::Task { subcommand } => cmd::plan::run_task(&root, subcommand, cli.json),
        Commands::Criteria { subcommand } => cmd::plan::run_criteria(&root, subcommand, cli.json),
        Commands::Resolve => cmd::resolve::run(&root, cli.json),
        Commands::Reindex => cmd::reindex::run(&root, cli.json),
        Commands::Render => cmd::render::run(&root),
        Commands::Cache { subcommand } => cmd::cache::run(&root, subcommand),
        Commands::Hooks { subcommand } => cmd::toggle::run(&root, subcommand),
        Commands::Hook { name } => cmd::hook::run(&root, name),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
