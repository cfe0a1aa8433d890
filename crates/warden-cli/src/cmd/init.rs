use anyhow::Context;
use std::path::Path;
use warden_core::config::Config;
use warden_core::io::{ensure_dir, write_if_missing};
use warden_core::paths;
use warden_core::roadmap::Roadmap;

/// Scaffold the supervised-project layout. Idempotent: existing files are
/// never overwritten.
pub fn run(root: &Path, name: Option<&str>, version: &str) -> anyhow::Result<()> {
    let name = match name {
        Some(n) => n.to_string(),
        None => root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("project")
            .to_string(),
    };

    let product = serde_json::to_string_pretty(&serde_json::json!({
        "name": name,
        "current_version": version,
    }))? + "\n";
    let wrote_product = write_if_missing(&paths::product_path(root), product.as_bytes())
        .context("failed to write product.json")?;

    let specs = paths::specs_dir(root, version);
    ensure_dir(&specs)?;
    for file in paths::SPEC_FILES {
        let title = file.trim_end_matches(".md").replace('-', " ");
        write_if_missing(&specs.join(file), format!("# {title}\n").as_bytes())?;
    }

    let release_plan = paths::release_plan_dir(root, version);
    ensure_dir(&release_plan)?;
    write_if_missing(&release_plan.join("overview.md"), b"# Release overview\n")?;

    let roadmap_path = paths::roadmap_path(root, version);
    if !roadmap_path.exists() {
        let mut roadmap = Roadmap::new(&name, version, None);
        roadmap
            .save_to(&roadmap_path)
            .context("failed to write roadmap.json")?;
    }

    ensure_dir(&paths::milestones_dir(root, version))?;

    ensure_dir(&paths::warden_dir(root))?;
    let config = serde_yaml::to_string(&Config::default())?;
    write_if_missing(&paths::config_path(root), config.as_bytes())?;

    if wrote_product {
        println!("initialized {} {} at {}", name, version, root.display());
    } else {
        println!("already initialized at {}", root.display());
    }
    Ok(())
}
