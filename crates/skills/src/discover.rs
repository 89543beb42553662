//! Skill discovery over a [`ContentSource`].
//!
//! Skills live one level below `skills/`. A direct child that has no manifest
//! is treated as a pack and searched one level deeper; packs do not nest.

use std::collections::HashMap;

use crate::{
    error::{Error, Result},
    parse,
    source::{self, ContentSource},
    types::{DEFAULT_MODEL, FlatItem, MANIFEST_FILE, MANIFEST_FILE_FALLBACK, Skill},
};

/// Root of the skills subtree inside a content source.
pub const SKILLS_DIR: &str = "skills";

/// Flat subtree holding agent definitions.
pub const AGENTS_DIR: &str = "agents";

/// Flat subtree holding slash-command definitions.
pub const COMMANDS_DIR: &str = "commands";

/// What a candidate directory turned out to be.
#[derive(Debug)]
pub enum Probe {
    /// Manifest found and parsed.
    Parsed(Skill),
    /// Manifest found but unparseable; the skill is named after its directory.
    Fallback { skill: Skill, reason: Error },
    /// No manifest in the directory.
    NotAUnit,
}

/// Discover every skill under `skills/`, in listing order.
///
/// A source without a `skills/` directory yields no skills.
pub fn discover(source: &dyn ContentSource) -> Result<Vec<Skill>> {
    let entries = match source.list(SKILLS_DIR) {
        Ok(entries) => entries,
        Err(Error::NotFound { .. }) => {
            tracing::info!(source = %source.describe(), "no skills directory in source");
            return Ok(Vec::new());
        },
        Err(e) => return Err(e),
    };

    let mut skills = Vec::new();
    for entry in entries.iter().filter(|e| e.is_dir()) {
        let dir = source::join(SKILLS_DIR, &entry.name);
        match probe(source, &dir)? {
            Probe::Parsed(skill) => skills.push(skill),
            Probe::Fallback { skill, reason } => {
                tracing::warn!(%dir, %reason, "unparseable manifest, using directory name");
                skills.push(skill);
            },
            Probe::NotAUnit => discover_pack(source, &dir, &entry.name, &mut skills)?,
        }
    }

    warn_duplicates(&skills);
    tracing::debug!(count = skills.len(), source = %source.describe(), "discovered skills");
    Ok(skills)
}

/// Probe one candidate directory for a manifest.
///
/// The returned skill has no pack; [`discover`] assigns it.
pub fn probe(source: &dyn ContentSource, dir: &str) -> Result<Probe> {
    let entries = match source.list(dir) {
        Ok(entries) => entries,
        Err(Error::NotFound { .. }) => return Ok(Probe::NotAUnit),
        Err(e) => return Err(e),
    };

    let Some(manifest_name) = [MANIFEST_FILE, MANIFEST_FILE_FALLBACK]
        .into_iter()
        .find(|name| entries.iter().any(|e| e.is_file() && e.name == *name))
    else {
        return Ok(Probe::NotAUnit);
    };

    let manifest_path = source::join(dir, manifest_name);
    let manifest = source.read(&manifest_path)?;

    Ok(match parse::parse_metadata(&manifest) {
        Ok(meta) => Probe::Parsed(Skill::from_metadata(
            meta,
            None,
            dir.to_string(),
            manifest_path,
            manifest,
        )),
        Err(reason) => Probe::Fallback {
            skill: Skill::fallback(
                source::base_name(dir),
                None,
                dir.to_string(),
                manifest_path,
                manifest,
            ),
            reason,
        },
    })
}

fn discover_pack(
    source: &dyn ContentSource,
    pack_dir: &str,
    pack: &str,
    skills: &mut Vec<Skill>,
) -> Result<()> {
    let before = skills.len();
    for entry in source.list(pack_dir)?.iter().filter(|e| e.is_dir()) {
        let dir = source::join(pack_dir, &entry.name);
        let mut skill = match probe(source, &dir)? {
            Probe::Parsed(skill) => skill,
            Probe::Fallback { skill, reason } => {
                tracing::warn!(%dir, %reason, "unparseable manifest, using directory name");
                skill
            },
            Probe::NotAUnit => {
                tracing::debug!(%dir, "no manifest, skipping");
                continue;
            },
        };
        skill.pack = Some(pack.to_string());
        skills.push(skill);
    }

    if skills.len() == before {
        tracing::debug!(dir = %pack_dir, "directory holds no skills");
    }
    Ok(())
}

fn warn_duplicates(skills: &[Skill]) {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for skill in skills {
        if let Some(first) = seen.insert(&skill.name, &skill.root) {
            tracing::warn!(
                name = %skill.name,
                first = %first,
                second = %skill.root,
                "duplicate skill name"
            );
        }
    }
}

/// Markdown files directly inside a flat subtree such as `agents/`.
///
/// Files whose header does not parse keep their file stem as name. A missing
/// subtree yields no items.
pub fn discover_flat(source: &dyn ContentSource, root: &str) -> Result<Vec<FlatItem>> {
    let entries = match source.list(root) {
        Ok(entries) => entries,
        Err(Error::NotFound { .. }) => {
            tracing::info!(%root, source = %source.describe(), "subtree not present in source");
            return Ok(Vec::new());
        },
        Err(e) => return Err(e),
    };

    let mut items = Vec::new();
    for entry in entries
        .iter()
        .filter(|e| e.is_file() && e.name.ends_with(".md"))
    {
        let path = source::join(root, &entry.name);
        let content = source.read(&path)?;
        let stem = entry.name.trim_end_matches(".md");

        let item = match parse::parse_metadata(&content) {
            Ok(meta) => FlatItem {
                name: meta.name,
                description: meta.description,
                model: meta.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                tags: meta.tags,
                languages: meta.languages,
                path,
                file_name: entry.name.clone(),
            },
            Err(e) => {
                tracing::debug!(%path, %e, "no usable header, using file name");
                FlatItem {
                    name: stem.to_string(),
                    description: String::new(),
                    model: DEFAULT_MODEL.to_string(),
                    tags: Vec::new(),
                    languages: Vec::new(),
                    path,
                    file_name: entry.name.clone(),
                }
            },
        };
        items.push(item);
    }
    Ok(items)
}
