use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use warden_core::reindex::reindex;
use warden_core::roadmap::Roadmap;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut roadmap = Roadmap::load(root).context("failed to load roadmap")?;
    let changes = reindex(&mut roadmap);
    roadmap.save(root).context("failed to save roadmap")?;

    if json {
        #[derive(serde::Serialize)]
        struct Change<'a> {
            old: &'a str,
            new: &'a str,
        }
        let out: Vec<Change> = changes
            .iter()
            .map(|c| Change {
                old: &c.old,
                new: &c.new,
            })
            .collect();
        return print_json(&out);
    }

    if changes.is_empty() {
        println!("ids already positional");
    }
    for change in changes {
        println!("{} -> {}", change.old, change.new);
    }
    Ok(())
}
