use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use warden_core::resolve::resolve;
use warden_core::roadmap::Roadmap;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut roadmap = Roadmap::load(root).context("failed to load roadmap")?;
    let changes = resolve(&mut roadmap);
    roadmap.save(root).context("failed to save roadmap")?;

    if json {
        #[derive(serde::Serialize)]
        struct Change<'a> {
            entity: &'a str,
            message: &'a str,
        }
        let out: Vec<Change> = changes
            .iter()
            .map(|c| Change {
                entity: &c.entity,
                message: &c.message,
            })
            .collect();
        return print_json(&out);
    }

    if changes.is_empty() {
        println!("nothing to resolve");
    }
    for change in changes {
        println!("{}: {}", change.entity, change.message);
    }
    Ok(())
}
