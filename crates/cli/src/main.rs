mod bundle;
mod init_commands;
mod install_commands;
mod list_commands;
mod targets;

use {
    clap::{Parser, Subcommand},
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "skillport",
    about = "Install AI coding assistant skills",
    long_about = "Install AI coding assistant skills for various IDEs and tools.\n\n\
                  Supported targets:\n  \
                  - Claude Code (.claude/skills)\n  \
                  - GitHub Copilot (.github/skills)\n  \
                  - Cursor (.cursor/skills)\n  \
                  - OpenCode (.opencode/skills)\n  \
                  - VS Code with Claude extension (.vscode/claude/skills)\n\n\
                  Configuration can be stored in .skillport.yaml",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Install flags (used when no subcommand is provided).
    #[command(flatten)]
    install: install_commands::InstallArgs,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Install bundled (or external) skills into a target (default).
    Install(install_commands::InstallArgs),
    /// List available skills.
    List(list_commands::ListArgs),
    /// Show details about a skill.
    Info {
        /// Skill name.
        name: String,
    },
    /// Create a new skill from template.
    Init(init_commands::InitArgs),
    /// Print the version number.
    Version,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // Results go to stdout; diagnostics stay on stderr.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    debug!(version = env!("CARGO_PKG_VERSION"), "skillport starting");

    match cli.command {
        None => install_commands::handle_install(cli.install).await,
        Some(Commands::Install(args)) => install_commands::handle_install(args).await,
        Some(Commands::List(args)) => list_commands::handle_list(args),
        Some(Commands::Info { name }) => list_commands::handle_info(&name),
        Some(Commands::Init(args)) => init_commands::handle_init(args),
        Some(Commands::Version) => {
            println!("skillport v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        },
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, clap::CommandFactory};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_installs() {
        let cli = Cli::try_parse_from(["skillport", "-t", "copilot", "-f", "--tag", "a,b"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.install.target.as_deref(), Some("copilot"));
        assert!(cli.install.force);
        assert_eq!(cli.install.tags, vec!["a", "b"]);
    }

    #[test]
    fn subcommands_parse() {
        let cli = Cli::try_parse_from(["skillport", "list", "--json", "--pack", "python"]).unwrap();
        match cli.command {
            Some(Commands::List(args)) => {
                assert!(args.json);
                assert_eq!(args.packs, vec!["python"]);
            },
            _ => panic!("expected list"),
        }

        let cli = Cli::try_parse_from(["skillport", "info", "commit", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Some(Commands::Info { name }) if name == "commit"));
    }
}
