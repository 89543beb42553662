//! `skillport init`: scaffold a new skill directory.

use std::path::{Component, Path, PathBuf};

use {
    clap::Args,
    skillport_skills::{
        WritePolicy, WriteResult, Writer,
        template::render_skill_template,
        types::{DEFAULT_MODEL, MANIFEST_FILE},
    },
};

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Skill name; also the directory created.
    pub name: String,
    /// Model to use (haiku, sonnet, opus).
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,
    /// Tags for the skill (default: custom).
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Languages for the skill.
    #[arg(long = "lang", value_delimiter = ',', default_value = "any")]
    pub languages: Vec<String>,
    /// Description of the skill.
    #[arg(short = 'd', long = "desc")]
    pub description: Option<String>,
    /// Overwrite an existing manifest.
    #[arg(short, long)]
    pub force: bool,
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

pub fn handle_init(args: InitArgs) -> anyhow::Result<()> {
    let path = manifest_path(&args.name)?;
    let description = args
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("Custom skill for {}", args.name));
    let tags = if args.tags.is_empty() {
        vec!["custom".to_string()]
    } else {
        args.tags
    };

    let content = render_skill_template(&args.name, &description, &args.model, &tags, &args.languages);
    let writer = Writer::new(WritePolicy {
        force: args.force,
        dry_run: args.dry_run,
    });

    let result = writer.write(&path, content.as_bytes())?;
    println!("{result}");
    if matches!(result, WriteResult::Created(_) | WriteResult::Updated(_)) {
        println!("\nEdit the file to customize your skill, then move the directory to your skills location.");
    }
    Ok(())
}

/// `<name>/SKILL.md`, refusing names that are not a single path segment.
fn manifest_path(name: &str) -> anyhow::Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(Path::new(name).join(MANIFEST_FILE)),
        _ => anyhow::bail!("invalid skill name '{name}': must be a single directory name"),
    }
}
