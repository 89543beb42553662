//! Frontmatter parsing for skill manifests.
//!
//! The header block sits between two lines consisting solely of `---`. Only a
//! fixed set of keys is recognized; everything else in the block is ignored so
//! manifests written for newer tools still parse.

use crate::{
    error::{Error, Result},
    types::SkillMetadata,
};

const DELIMITER: &str = "---";

/// Parse a manifest's frontmatter into metadata.
///
/// Fails with [`Error::MissingName`] when the header block has no non-empty
/// `name:` line, including when there is no header block at all.
pub fn parse_metadata(content: &[u8]) -> Result<SkillMetadata> {
    let text = String::from_utf8_lossy(content);
    let (header, _body) = split_frontmatter(&text);

    let mut meta = SkillMetadata::default();
    for line in header {
        if let Some(v) = line.strip_prefix("name:") {
            meta.name = v.trim().to_string();
        } else if let Some(v) = line.strip_prefix("description:") {
            meta.description = v.trim().to_string();
        } else if let Some(v) = line.strip_prefix("model:") {
            let v = v.trim();
            meta.model = (!v.is_empty()).then(|| v.to_string());
        } else if let Some(v) = line.strip_prefix("tags:") {
            meta.tags = parse_list(v);
        } else if let Some(v) = line.strip_prefix("languages:") {
            meta.languages = parse_list(v);
        }
    }

    if meta.name.is_empty() {
        return Err(Error::MissingName);
    }
    Ok(meta)
}

/// Markdown body of a manifest: everything after the closing delimiter.
///
/// A document without any header block is returned whole.
pub fn body(content: &[u8]) -> String {
    let text = String::from_utf8_lossy(content);
    let (_header, body) = split_frontmatter(&text);
    body.trim().to_string()
}

/// Parse a list value: a bare token (`core`) or a bracketed list (`[a, b]`).
pub fn parse_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    match raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        None => vec![raw.to_string()],
    }
}

/// Split manifest text into (trimmed header lines, body).
///
/// Lines before the opening delimiter are skipped. An unterminated header
/// runs to end of input and leaves an empty body.
fn split_frontmatter(text: &str) -> (Vec<&str>, &str) {
    let mut header = Vec::new();
    let mut opened = false;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        offset += line.len();
        let trimmed = line.trim();
        if trimmed == DELIMITER {
            if opened {
                return (header, &text[offset..]);
            }
            opened = true;
            continue;
        }
        if opened {
            header.push(trimmed);
        }
    }

    if opened { (header, "") } else { (header, text) }
}
