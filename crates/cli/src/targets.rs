//! Installation targets: where each supported assistant looks for skills,
//! agents and commands.

use std::path::{Path, PathBuf};

use skillport_skills::install::{RenameFn, copilot_agent_name};

pub const DEFAULT_TARGET: &str = "claude";

pub struct Target {
    pub key: &'static str,
    pub name: &'static str,
    pub skills_path: &'static str,
    pub agents_path: &'static str,
    pub commands_path: Option<&'static str>,
    /// User-level skills directory, relative to the home directory.
    pub global_skills_path: Option<&'static str>,
    pub global_agents_path: Option<&'static str>,
    /// File name mapping applied to installed agents.
    pub agent_rename: Option<RenameFn>,
}

pub const TARGETS: &[Target] = &[
    Target {
        key: "claude",
        name: "Claude Code",
        skills_path: ".claude/skills",
        agents_path: ".claude/agents",
        commands_path: Some(".claude/commands"),
        global_skills_path: Some(".claude/skills"),
        global_agents_path: Some(".claude/agents"),
        agent_rename: None,
    },
    Target {
        key: "copilot",
        name: "GitHub Copilot",
        skills_path: ".github/skills",
        agents_path: ".github",
        commands_path: None,
        global_skills_path: Some(".copilot/skills"),
        global_agents_path: None,
        agent_rename: Some(copilot_agent_name),
    },
    Target {
        key: "cursor",
        name: "Cursor",
        skills_path: ".cursor/skills",
        agents_path: ".cursor/agents",
        commands_path: None,
        global_skills_path: None,
        global_agents_path: None,
        agent_rename: None,
    },
    Target {
        key: "opencode",
        name: "OpenCode",
        skills_path: ".opencode/skills",
        agents_path: ".opencode/agents",
        commands_path: None,
        global_skills_path: None,
        global_agents_path: None,
        agent_rename: None,
    },
    Target {
        key: "vscode",
        name: "VS Code (with Claude extension)",
        skills_path: ".vscode/claude/skills",
        agents_path: ".vscode/claude/agents",
        commands_path: None,
        global_skills_path: None,
        global_agents_path: None,
        agent_rename: None,
    },
];

/// Look up a target by key, ignoring case.
pub fn find(key: &str) -> Option<&'static Target> {
    TARGETS.iter().find(|t| t.key.eq_ignore_ascii_case(key.trim()))
}

pub fn keys() -> Vec<&'static str> {
    TARGETS.iter().map(|t| t.key).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Project,
    Global,
}

/// Resolved output directories for one install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    pub skills: PathBuf,
    pub agents: Option<PathBuf>,
    pub commands: Option<PathBuf>,
}

impl Target {
    pub fn supports_global(&self) -> bool {
        self.global_skills_path.is_some()
    }

    /// Scope for a run. Targets without user-level directories always install
    /// into the project.
    pub fn scope(&self, global: bool) -> Scope {
        match (global, self.supports_global()) {
            (true, true) => Scope::Global,
            (true, false) => {
                tracing::warn!(
                    key = self.key,
                    "target has no global directory, installing into the project"
                );
                Scope::Project
            },
            (false, _) => Scope::Project,
        }
    }

    /// Output directories for `scope`. Project paths are relative to the
    /// working directory; global paths are rooted at `home`. Commands are
    /// only ever installed per project.
    pub fn destinations(&self, scope: Scope, home: Option<&Path>) -> anyhow::Result<Destinations> {
        match scope {
            Scope::Project => Ok(Destinations {
                skills: PathBuf::from(self.skills_path),
                agents: Some(PathBuf::from(self.agents_path)),
                commands: self.commands_path.map(PathBuf::from),
            }),
            Scope::Global => {
                let home = home.ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
                let skills = self
                    .global_skills_path
                    .ok_or_else(|| anyhow::anyhow!("target '{}' has no global skills directory", self.key))?;
                Ok(Destinations {
                    skills: home.join(skills),
                    agents: self.global_agents_path.map(|p| home.join(p)),
                    commands: None,
                })
            },
        }
    }
}
