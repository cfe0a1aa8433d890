//! Stash and restore the `hooks` object in the agent settings file.

use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use warden_core::cache::Cache;
use warden_core::config::Config;
use warden_core::io::atomic_write;

#[derive(Subcommand)]
pub enum HooksSubcommand {
    /// Remove the hooks from the settings file, stashing them in the cache
    Off,

    /// Restore the stashed hooks into the settings file
    On,
}

pub fn run(root: &Path, subcommand: HooksSubcommand) -> anyhow::Result<()> {
    let config = Config::load_or_default(root)?;
    let settings_path = root.join(&config.settings_file);
    let mut cache = Cache::load(root);

    let mut settings: serde_json::Value = if settings_path.exists() {
        let text = std::fs::read_to_string(&settings_path)
            .with_context(|| format!("failed to read {}", settings_path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid JSON", settings_path.display()))?
    } else {
        serde_json::json!({})
    };

    match subcommand {
        HooksSubcommand::Off => {
            let Some(hooks) = settings.as_object_mut().and_then(|o| o.remove("hooks")) else {
                println!("no hooks configured");
                return Ok(());
            };
            cache.stashed_hooks = Some(hooks);
            cache.save(root)?;
            write_settings(&settings_path, &settings)?;
            println!("hooks disabled");
        }
        HooksSubcommand::On => {
            let Some(hooks) = cache.stashed_hooks.take() else {
                println!("no stashed hooks to restore");
                return Ok(());
            };
            settings
                .as_object_mut()
                .context("settings file is not a JSON object")?
                .insert("hooks".to_string(), hooks);
            cache.save(root)?;
            write_settings(&settings_path, &settings)?;
            println!("hooks restored");
        }
    }
    Ok(())
}

fn write_settings(path: &Path, settings: &serde_json::Value) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(settings)? + "\n";
    atomic_write(path, text.as_bytes())?;
    Ok(())
}
