use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::Serialize;

/// Model assigned to skills whose manifest does not name one.
pub const DEFAULT_MODEL: &str = "sonnet";

/// Primary manifest file name inside a skill directory.
pub const MANIFEST_FILE: &str = "SKILL.md";

/// Lowercase manifest name accepted when [`MANIFEST_FILE`] is absent.
pub const MANIFEST_FILE_FALLBACK: &str = "skill.md";

// ── Skill metadata ───────────────────────────────────────────────────────────

/// Fields parsed from a manifest's frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillMetadata {
    pub name: String,
    pub description: String,
    /// `None` when the manifest has no (or an empty) `model:` line.
    pub model: Option<String>,
    pub tags: Vec<String>,
    pub languages: Vec<String>,
}

/// An installable skill: a directory with a manifest plus auxiliary files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub model: String,
    pub tags: Vec<String>,
    pub languages: Vec<String>,
    /// Pack directory the skill lives in; `None` for top-level (core) skills.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,
    /// Skill directory inside the content source, e.g. `skills/python/pytest`.
    pub root: String,
    /// Manifest path inside the content source.
    pub manifest_path: String,
    /// Raw manifest bytes.
    #[serde(skip)]
    pub manifest: Vec<u8>,
}

impl Skill {
    pub(crate) fn from_metadata(
        meta: SkillMetadata,
        pack: Option<String>,
        root: String,
        manifest_path: String,
        manifest: Vec<u8>,
    ) -> Self {
        Self {
            name: meta.name,
            description: meta.description,
            model: meta.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            tags: meta.tags,
            languages: meta.languages,
            pack,
            root,
            manifest_path,
            manifest,
        }
    }

    /// Minimal skill named after its directory, used when the manifest does not parse.
    pub(crate) fn fallback(
        dir_name: &str,
        pack: Option<String>,
        root: String,
        manifest_path: String,
        manifest: Vec<u8>,
    ) -> Self {
        Self::from_metadata(
            SkillMetadata {
                name: dir_name.to_string(),
                ..SkillMetadata::default()
            },
            pack,
            root,
            manifest_path,
            manifest,
        )
    }

    /// Pack label for display: the pack name, or `core` for top-level skills.
    pub fn pack_label(&self) -> &str {
        self.pack.as_deref().unwrap_or("core")
    }
}

/// A single markdown file from a flat subtree such as `agents/` or `commands/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatItem {
    /// Frontmatter name, or the file stem when the header has none.
    pub name: String,
    pub description: String,
    pub model: String,
    pub tags: Vec<String>,
    pub languages: Vec<String>,
    /// Path inside the content source, e.g. `agents/reviewer.md`.
    pub path: String,
    pub file_name: String,
}

// ── Write results ────────────────────────────────────────────────────────────

/// Flags that decide what happens to a destination file that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WritePolicy {
    /// Overwrite existing files.
    pub force: bool,
    /// Report what would happen without touching the filesystem.
    pub dry_run: bool,
}

/// Outcome of one attempted file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    Created(PathBuf),
    Updated(PathBuf),
    Skipped(PathBuf),
    WouldCreate(PathBuf),
    WouldUpdate(PathBuf),
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(p)
            | Self::Updated(p)
            | Self::Skipped(p)
            | Self::WouldCreate(p)
            | Self::WouldUpdate(p) => p,
        }
    }
}

impl fmt::Display for WriteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(p) => write!(f, "CREATED: {}", p.display()),
            Self::Updated(p) => write!(f, "UPDATED: {}", p.display()),
            Self::Skipped(p) => write!(
                f,
                "SKIP: {} (already exists, use --force to overwrite)",
                p.display()
            ),
            Self::WouldCreate(p) => write!(f, "WOULD CREATE: {}", p.display()),
            Self::WouldUpdate(p) => write!(f, "WOULD OVERWRITE: {}", p.display()),
        }
    }
}
