//! Config schema for `.skillport.*` files.
use serde::{Deserialize, Serialize};

/// Root configuration. Every field is optional in the file; command-line
/// flags take precedence over anything set here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillportConfig {
    /// Installation target key (`claude`, `copilot`, `cursor`, `opencode`, `vscode`).
    pub target: Option<String>,
    /// Only install skills carrying one of these tags.
    pub tags: Vec<String>,
    /// Only install skills declaring one of these languages (or `any`).
    pub languages: Vec<String>,
    /// Only install skills from these packs (`core` = top-level skills).
    pub packs: Vec<String>,
    /// External source locator: local path, git URL or tarball URL.
    pub from: Option<String>,
    /// Install into the user-level directories instead of the project.
    pub global: bool,
    pub skip_agents: bool,
    pub skip_commands: bool,
    pub fetch: FetchConfig,
}

/// Network settings for remote sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Upper bound for `git clone`. Defaults to 120 seconds.
    pub clone_timeout_secs: u64,
    /// Upper bound for a tarball download, body included. Defaults to 300 seconds.
    pub download_timeout_secs: u64,
    /// `User-Agent` header sent with tarball requests.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            clone_timeout_secs: 120,
            download_timeout_secs: 300,
            user_agent: format!("skillport/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
