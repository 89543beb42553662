//! `skillport list` and `skillport info`: browse the bundled catalogue.

use {
    clap::Args,
    skillport_skills::{Filter, Installer, Skill, Writer, parse},
};

use crate::bundle;

const NAME_WIDTH: usize = 35;
const DESCRIPTION_WIDTH: usize = 45;

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Filter by tags.
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Filter by language.
    #[arg(long = "lang", value_delimiter = ',')]
    pub languages: Vec<String>,
    /// Filter by pack (`core` for top-level skills).
    #[arg(long = "pack", value_delimiter = ',')]
    pub packs: Vec<String>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn handle_list(args: ListArgs) -> anyhow::Result<()> {
    let bundle = bundle::source();
    let installer = Installer::new(&bundle, Writer::default());
    let filter = Filter::new(args.tags, args.languages, args.packs);

    let skills: Vec<Skill> = installer
        .list_skills()?
        .into_iter()
        .filter(|s| filter.matches(s))
        .collect();

    if args.json {
        let agents = installer.list_agents()?;
        let commands = installer.list_commands()?;
        let out = serde_json::json!({
            "skills": skills,
            "agents": agents,
            "commands": commands,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if skills.is_empty() {
        println!("No skills match the specified filters.");
        return Ok(());
    }

    println!("Available skills ({}):\n", skills.len());
    for skill in &skills {
        println!("{}", format_row(skill));
    }

    if filter.is_empty() {
        let agents = installer.list_agents()?;
        if !agents.is_empty() {
            println!("\nAvailable agents ({}):\n", agents.len());
            for agent in &agents {
                println!(
                    "  {:<NAME_WIDTH$} {}",
                    agent.name,
                    truncate(&agent.description, DESCRIPTION_WIDTH)
                );
            }
        }
    }
    Ok(())
}

pub fn handle_info(name: &str) -> anyhow::Result<()> {
    let bundle = bundle::source();
    let skills = Installer::new(&bundle, Writer::default()).list_skills()?;

    let skill = skills
        .iter()
        .find(|s| s.name == name)
        .or_else(|| skills.iter().find(|s| s.name.eq_ignore_ascii_case(name)))
        .ok_or_else(|| anyhow::anyhow!("skill '{name}' not found"))?;

    println!("Name:        {}", skill.name);
    println!("Description: {}", skill.description);
    println!("Model:       {}", skill.model);
    println!("Pack:        {}", skill.pack_label());
    if !skill.tags.is_empty() {
        println!("Tags:        {}", skill.tags.join(", "));
    }
    if !skill.languages.is_empty() {
        println!("Languages:   {}", skill.languages.join(", "));
    }
    println!("Path:        {}", skill.root);
    println!("\n{}", parse::body(&skill.manifest));
    Ok(())
}

fn format_row(skill: &Skill) -> String {
    let tags = if skill.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", skill.tags.join(", "))
    };
    format!(
        "  {:<NAME_WIDTH$} {}{tags}",
        skill.name,
        truncate(&skill.description, DESCRIPTION_WIDTH)
    )
}

/// Shorten `s` to at most `max` characters, ending in `...` when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
