use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    env_subst::substitute_env,
    error::{Error, Result},
    schema::SkillportConfig,
};

/// Project-local config file names, checked in order.
const PROJECT_CONFIG_FILENAMES: &[&str] = &[
    ".skillport.yaml",
    ".skillport.yml",
    ".skillport.toml",
    ".skillport.json",
    ".skill-installer.yaml",
    ".skill-installer.yml",
    "skill-installer.yaml",
    "skill-installer.yml",
];

/// File names looked up in the user config directory.
const USER_CONFIG_FILENAMES: &[&str] = &[
    "skillport.toml",
    "skillport.yaml",
    "skillport.yml",
    "skillport.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<SkillportConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config starting from `project_dir`.
///
/// Search order:
/// 1. `<project_dir>/.skillport.{yaml,yml,toml,json}` and the legacy
///    `.skill-installer.{yaml,yml}` names
/// 2. `~/.config/skillport/skillport.{toml,yaml,yml,json}`
///
/// Returns `SkillportConfig::default()` when no file exists. A file that
/// exists but does not parse is an error.
pub fn discover_and_load(project_dir: &Path) -> Result<SkillportConfig> {
    match find_config_file(project_dir) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path)
        },
        None => {
            debug!("no config file found, using defaults");
            Ok(SkillportConfig::default())
        },
    }
}

/// Find the first config file in the project directory, then the user config dir.
pub fn find_config_file(project_dir: &Path) -> Option<PathBuf> {
    let project = PROJECT_CONFIG_FILENAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|p| p.is_file());
    if project.is_some() {
        return project;
    }

    let user_dir = user_config_dir()?;
    USER_CONFIG_FILENAMES
        .iter()
        .map(|name| user_dir.join(name))
        .find(|p| p.is_file())
}

/// Returns the user-global config directory (`~/.config/skillport/`).
pub fn user_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "skillport").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<SkillportConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    match ext {
        "yaml" | "yml" => {
            // An empty YAML document deserializes to unit, not to a map.
            if raw.trim().is_empty() {
                return Ok(SkillportConfig::default());
            }
            Ok(serde_yaml::from_str(raw)?)
        },
        "toml" => Ok(toml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::UnsupportedFormat {
            ext: ext.to_string(),
        }),
    }
}
