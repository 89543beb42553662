//! `skillport install`: copy skills, agents and commands into a target.

use std::{path::PathBuf, time::Duration};

use {
    anyhow::Context,
    clap::Args,
    skillport_config::SkillportConfig,
    skillport_skills::{
        FetchOptions, Filter, Installer, SourceLocator, WritePolicy, WriteResult, Writer, install,
    },
};

use crate::{bundle, targets};

#[derive(Args, Debug, Clone, Default)]
pub struct InstallArgs {
    /// Target: claude, copilot, cursor, opencode, vscode.
    #[arg(short, long)]
    pub target: Option<String>,
    /// Install into the user-level directories instead of the project.
    #[arg(long)]
    pub global: bool,
    /// Overwrite existing files.
    #[arg(short, long)]
    pub force: bool,
    /// Show what would be done without making changes.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
    /// Only install skills with one of these tags.
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Only install skills for one of these languages.
    #[arg(long = "lang", value_delimiter = ',')]
    pub languages: Vec<String>,
    /// Only install skills from these packs (`core` for top-level skills).
    #[arg(long = "pack", value_delimiter = ',')]
    pub packs: Vec<String>,
    /// Install from a local path, git URL or tarball URL instead of the bundle.
    #[arg(long)]
    pub from: Option<String>,
    /// Config file path (default: discover `.skillport.*` in the working directory).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub skip_agents: bool,
    #[arg(long)]
    pub skip_commands: bool,
}

/// Flags merged over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InstallPlan {
    target: String,
    global: bool,
    policy: WritePolicy,
    filter: Filter,
    from: Option<String>,
    skip_agents: bool,
    skip_commands: bool,
    fetch: FetchOptions,
}

impl InstallPlan {
    fn resolve(args: InstallArgs, config: SkillportConfig) -> Self {
        let pick = |flag: Vec<String>, file: Vec<String>| if flag.is_empty() { file } else { flag };

        Self {
            target: args
                .target
                .or(config.target)
                .unwrap_or_else(|| targets::DEFAULT_TARGET.to_string()),
            global: args.global || config.global,
            policy: WritePolicy {
                force: args.force,
                dry_run: args.dry_run,
            },
            filter: Filter::new(
                pick(args.tags, config.tags),
                pick(args.languages, config.languages),
                pick(args.packs, config.packs),
            ),
            from: args.from.or(config.from).filter(|s| !s.trim().is_empty()),
            skip_agents: args.skip_agents || config.skip_agents,
            skip_commands: args.skip_commands || config.skip_commands,
            fetch: FetchOptions {
                clone_timeout: Duration::from_secs(config.fetch.clone_timeout_secs),
                download_timeout: Duration::from_secs(config.fetch.download_timeout_secs),
                user_agent: config.fetch.user_agent,
            },
        }
    }
}

fn load_config(args: &InstallArgs) -> anyhow::Result<SkillportConfig> {
    match &args.config {
        Some(path) => skillport_config::load_config(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => {
            let cwd = std::env::current_dir()?;
            skillport_config::discover_and_load(&cwd).context("loading config")
        },
    }
}

pub async fn handle_install(args: InstallArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let plan = InstallPlan::resolve(args, config);

    let target = targets::find(&plan.target).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown target: {} (expected one of: {})",
            plan.target,
            targets::keys().join(", ")
        )
    })?;
    let scope = target.scope(plan.global);
    let home = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf());
    let dest = target.destinations(scope, home.as_deref())?;
    tracing::debug!(target_key = target.key, ?scope, ?dest, "resolved destinations");

    let writer = Writer::new(plan.policy);
    let bundle = bundle::source();
    let installer = Installer::new(&bundle, writer);

    println!("Installing skills for {}...", target.name);
    let results = match &plan.from {
        Some(from) => {
            if !plan.filter.is_empty() {
                tracing::warn!("tag, language and pack filters do not apply to --from sources");
            }
            let locator = SourceLocator::parse(from);
            install::install_from_source(&locator, &dest.skills, &writer, &plan.fetch).await?
        },
        None => installer.install_skills(&dest.skills, &plan.filter)?,
    };
    print_results(&results);

    if !plan.skip_agents
        && let Some(agents) = &dest.agents
    {
        println!("\nInstalling agents...");
        let results = installer.install_agents(agents, &Filter::default(), target.agent_rename)?;
        print_results(&results);
    }

    if !plan.skip_commands
        && let Some(commands) = &dest.commands
    {
        println!("\nInstalling commands...");
        let results = installer.install_commands(commands, &Filter::default(), None)?;
        print_results(&results);
    }

    if plan.policy.dry_run {
        println!("\n(dry run - no files were modified)");
    } else {
        println!("\nDone! Skills and agents installed successfully.");
    }
    Ok(())
}

fn print_results(results: &[WriteResult]) {
    if results.is_empty() {
        println!("  (nothing to install)");
    }
    for result in results {
        println!("{result}");
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags_or_config() {
        let plan = InstallPlan::resolve(InstallArgs::default(), SkillportConfig::default());
        assert_eq!(plan.target, "claude");
        assert!(plan.filter.is_empty());
        assert!(!plan.global);
        assert_eq!(plan.fetch.clone_timeout, Duration::from_secs(120));
        assert_eq!(plan.fetch.download_timeout, Duration::from_secs(300));
    }

    #[test]
    fn config_fills_unset_flags() {
        let config = SkillportConfig {
            target: Some("copilot".into()),
            tags: vec!["workflow".into()],
            languages: vec!["python".into()],
            from: Some("./vendor".into()),
            skip_agents: true,
            ..Default::default()
        };
        let plan = InstallPlan::resolve(InstallArgs::default(), config);
        assert_eq!(plan.target, "copilot");
        assert_eq!(plan.filter.tags, vec!["workflow"]);
        assert_eq!(plan.filter.languages, vec!["python"]);
        assert_eq!(plan.from.as_deref(), Some("./vendor"));
        assert!(plan.skip_agents);
    }

    #[test]
    fn flags_override_config() {
        let config = SkillportConfig {
            target: Some("copilot".into()),
            tags: vec!["workflow".into()],
            from: Some("".into()),
            ..Default::default()
        };
        let args = InstallArgs {
            target: Some("cursor".into()),
            tags: vec!["testing".into()],
            force: true,
            ..Default::default()
        };
        let plan = InstallPlan::resolve(args, config);
        assert_eq!(plan.target, "cursor");
        assert_eq!(plan.filter.tags, vec!["testing"]);
        assert!(plan.policy.force);
        assert_eq!(plan.from, None);
    }
}
