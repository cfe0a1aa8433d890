use anyhow::Context;
use std::path::Path;
use warden_core::paths;
use warden_core::render::write_markdown;
use warden_core::roadmap::Roadmap;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let roadmap = Roadmap::load(root).context("failed to load roadmap")?;
    write_markdown(root, &roadmap).context("failed to write roadmap.md")?;
    let version = paths::current_version(root)?;
    println!("wrote {}", paths::roadmap_md_path(root, &version).display());
    Ok(())
}
