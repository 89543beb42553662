//! Tag / language / pack selection.

use crate::types::{FlatItem, Skill};

/// Language value that satisfies every language request.
pub const ANY_LANGUAGE: &str = "any";

/// Pack name that selects top-level skills (those without a pack directory).
pub const CORE_PACK: &str = "core";

/// Requested selection. Empty lists place no constraint on their dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub tags: Vec<String>,
    pub languages: Vec<String>,
    pub packs: Vec<String>,
}

impl Filter {
    pub fn new(tags: Vec<String>, languages: Vec<String>, packs: Vec<String>) -> Self {
        Self {
            tags,
            languages,
            packs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.languages.is_empty() && self.packs.is_empty()
    }

    /// All requested dimensions must pass (AND); within a dimension any
    /// candidate may match (OR).
    pub fn matches(&self, skill: &Skill) -> bool {
        matches_tags_and_languages(&skill.tags, &skill.languages, &self.tags, &self.languages)
            && matches_pack(skill.pack.as_deref(), &self.packs)
    }

    /// Match an agent or command file. Flat items have no pack, so only tags
    /// and languages apply.
    pub fn matches_item(&self, item: &FlatItem) -> bool {
        matches_tags_and_languages(&item.tags, &item.languages, &self.tags, &self.languages)
    }
}

/// Tag and language match for a skill.
///
/// * no tags and no languages requested: always matches;
/// * tags requested: one of the skill's tags must equal one of them, ignoring case;
/// * languages requested: a skill declaring `any` passes, otherwise one of its
///   languages must equal one of them, ignoring case.
pub fn matches(skill: &Skill, tags: &[String], languages: &[String]) -> bool {
    matches_tags_and_languages(&skill.tags, &skill.languages, tags, languages)
}

fn matches_tags_and_languages(
    own_tags: &[String],
    own_languages: &[String],
    tags: &[String],
    languages: &[String],
) -> bool {
    if !tags.is_empty() && !tags.iter().any(|t| contains(own_tags, t)) {
        return false;
    }

    if !languages.is_empty()
        && !contains(own_languages, ANY_LANGUAGE)
        && !languages.iter().any(|l| contains(own_languages, l))
    {
        return false;
    }

    true
}

fn matches_pack(pack: Option<&str>, packs: &[String]) -> bool {
    if packs.is_empty() {
        return true;
    }
    let pack = pack.unwrap_or(CORE_PACK);
    packs.iter().any(|p| eq_fold(p, pack))
}

fn contains(haystack: &[String], needle: &str) -> bool {
    haystack.iter().any(|s| eq_fold(s, needle))
}

/// Unicode case-insensitive equality.
fn eq_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
