use clap::Subcommand;
use std::path::Path;
use warden_core::cache::Cache;

#[derive(Subcommand)]
pub enum CacheSubcommand {
    /// Clear workflow state, keeping the session id
    Reset,

    /// Remove the cache file entirely
    Delete,
}

pub fn run(root: &Path, subcommand: CacheSubcommand) -> anyhow::Result<()> {
    match subcommand {
        CacheSubcommand::Reset => {
            let mut cache = Cache::load(root);
            cache.reset();
            cache.save(root)?;
            println!("cache reset");
        }
        CacheSubcommand::Delete => {
            if Cache::delete(root)? {
                println!("cache deleted");
            } else {
                println!("no cache file");
            }
        }
    }
    Ok(())
}
