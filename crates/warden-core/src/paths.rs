use crate::error::{Result, WardenError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const WARDEN_DIR: &str = ".warden";
pub const CACHE_FILE: &str = ".warden/cache.json";
pub const CONFIG_FILE: &str = ".warden/config.yaml";

pub const PROJECT_DIR: &str = "project";
pub const PRODUCT_FILE: &str = "project/product.json";

/// Workspace subfolders created under each milestone directory.
pub const MILESTONE_SUBDIRS: &[&str] = &[
    "decisions",
    "plans",
    "research",
    "codebase-status",
    "revisions",
    "reports",
    "misc",
];

/// Files scaffolded under `project/<version>/specs/`.
pub const SPEC_FILES: &[&str] = &["brainstorm-summary.md", "prd.md", "tech-specs.md", "ux.md"];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn warden_dir(root: &Path) -> PathBuf {
    root.join(WARDEN_DIR)
}

pub fn cache_path(root: &Path) -> PathBuf {
    root.join(CACHE_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn product_path(root: &Path) -> PathBuf {
    root.join(PRODUCT_FILE)
}

pub fn version_dir(root: &Path, version: &str) -> PathBuf {
    root.join(PROJECT_DIR).join(version)
}

pub fn specs_dir(root: &Path, version: &str) -> PathBuf {
    version_dir(root, version).join("specs")
}

pub fn release_plan_dir(root: &Path, version: &str) -> PathBuf {
    version_dir(root, version).join("release-plan")
}

pub fn roadmap_path(root: &Path, version: &str) -> PathBuf {
    release_plan_dir(root, version).join("roadmap.json")
}

pub fn roadmap_md_path(root: &Path, version: &str) -> PathBuf {
    release_plan_dir(root, version).join("roadmap.md")
}

pub fn milestones_dir(root: &Path, version: &str) -> PathBuf {
    version_dir(root, version).join("phases").join("milestones")
}

pub fn milestone_workspace(root: &Path, version: &str, folder: &str) -> PathBuf {
    milestones_dir(root, version).join(folder)
}

// ---------------------------------------------------------------------------
// Current version lookup
// ---------------------------------------------------------------------------

/// Read `current_version` from `project/product.json`.
pub fn current_version(root: &Path) -> Result<String> {
    let path = product_path(root);
    if !path.exists() {
        return Err(WardenError::NotInitialized);
    }
    let data = std::fs::read_to_string(&path)?;
    let product: serde_json::Value = serde_json::from_str(&data)?;
    product
        .get("current_version")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or(WardenError::NoCurrentVersion)
}

// ---------------------------------------------------------------------------
// Milestone folder naming
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

/// Folder name for a milestone: `MS-NNN_<slugged-name>`.
pub fn milestone_folder_name(id: &str, name: &str) -> String {
    let slug = slug_re()
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string();
    if slug.is_empty() {
        id.to_string()
    } else {
        format!("{id}_{slug}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            roadmap_path(root, "v0.1.0"),
            PathBuf::from("/tmp/proj/project/v0.1.0/release-plan/roadmap.json")
        );
        assert_eq!(
            milestones_dir(root, "v0.1.0"),
            PathBuf::from("/tmp/proj/project/v0.1.0/phases/milestones")
        );
        assert_eq!(cache_path(root), PathBuf::from("/tmp/proj/.warden/cache.json"));
    }

    #[test]
    fn milestone_folder_slugging() {
        assert_eq!(
            milestone_folder_name("MS-001", "User Authentication & Login"),
            "MS-001_user-authentication-login"
        );
        assert_eq!(milestone_folder_name("MS-002", "  API  "), "MS-002_api");
        assert_eq!(milestone_folder_name("MS-003", "***"), "MS-003");
    }

    #[test]
    fn current_version_reads_product() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("project")).unwrap();
        std::fs::write(
            dir.path().join("project/product.json"),
            r#"{"name": "demo", "current_version": "v0.2.0"}"#,
        )
        .unwrap();
        assert_eq!(current_version(dir.path()).unwrap(), "v0.2.0");
    }

    #[test]
    fn current_version_missing_product() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            current_version(dir.path()),
            Err(WardenError::NotInitialized)
        ));
    }

    #[test]
    fn current_version_missing_field() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("project")).unwrap();
        std::fs::write(dir.path().join("project/product.json"), r#"{"name": "x"}"#).unwrap();
        assert!(matches!(
            current_version(dir.path()),
            Err(WardenError::NoCurrentVersion)
        ));
    }
}
