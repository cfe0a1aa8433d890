//! Optional per-project configuration, read from `.warden/config.yaml`.

use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The agent settings file toggled by `warden hooks off|on`.
    pub settings_file: String,
    /// Extensions counted as code when deciding whether a change needs a build.
    pub code_extensions: Vec<String>,
    /// Extra read-only Bash patterns allowed under safe-bash guardrails.
    pub safe_bash_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings_file: ".claude/settings.local.json".to_string(),
            code_extensions: [".ts", ".tsx", ".js", ".jsx", ".json", ".css", ".html", ".py"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            safe_bash_patterns: Vec::new(),
        }
    }
}

impl Config {
    /// Load the config, falling back to defaults when the file is absent.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn is_code_file(&self, path: &str) -> bool {
        self.code_extensions.iter().any(|ext| path.ends_with(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(config.settings_file, ".claude/settings.local.json");
        assert!(config.is_code_file("src/app.ts"));
        assert!(!config.is_code_file("README.md"));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".warden")).unwrap();
        std::fs::write(
            dir.path().join(".warden/config.yaml"),
            "code_extensions: ['.rs']\n",
        )
        .unwrap();
        let config = Config::load_or_default(dir.path()).unwrap();
        assert!(config.is_code_file("src/lib.rs"));
        assert!(!config.is_code_file("src/app.ts"));
        assert_eq!(config.settings_file, ".claude/settings.local.json");
    }
}
