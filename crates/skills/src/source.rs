//! Read-only content sources.
//!
//! Everything the installer consumes is reached through [`ContentSource`]: a
//! hierarchical namespace addressed by slash-separated paths relative to the
//! source root. The embedded bundle, in-memory trees and on-disk directories
//! (including cloned repos and extracted tarballs) all implement it, so
//! discovery and installation never care where bytes come from.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Kind of a child entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// A direct child of a listed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl SourceEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Hierarchical, read-only file namespace.
pub trait ContentSource: Send + Sync {
    /// Direct children of `path`, sorted by name. `""` is the source root.
    ///
    /// Returns [`Error::NotFound`] when `path` is not a directory.
    fn list(&self, path: &str) -> Result<Vec<SourceEntry>>;

    /// Full contents of the file at `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Human-readable origin, for log lines.
    fn describe(&self) -> String;
}

/// Join two source paths with `/`.
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

/// Last segment of a source path.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Every file below `root`, depth-first in listing order.
pub fn walk_files(source: &dyn ContentSource, root: &str) -> Result<Vec<String>> {
    walk_files_filtered(source, root, &|_| true)
}

/// Like [`walk_files`], but entries rejected by `keep` are not visited. A
/// rejected directory prunes its whole subtree.
pub fn walk_files_filtered(
    source: &dyn ContentSource,
    root: &str,
    keep: &dyn Fn(&SourceEntry) -> bool,
) -> Result<Vec<String>> {
    let mut files = Vec::new();
    walk_into(source, root, keep, &mut files)?;
    Ok(files)
}

fn walk_into(
    source: &dyn ContentSource,
    dir: &str,
    keep: &dyn Fn(&SourceEntry) -> bool,
    files: &mut Vec<String>,
) -> Result<()> {
    for entry in source.list(dir)?.into_iter().filter(|e| keep(e)) {
        let path = join(dir, &entry.name);
        match entry.kind {
            EntryKind::File => files.push(path),
            EntryKind::Dir => walk_into(source, &path, keep, files)?,
        }
    }
    Ok(())
}

// ── On-disk directory ───────────────────────────────────────────────────────

/// A directory on the local filesystem. Files are read lazily; symlinks
/// below the root are skipped.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

impl ContentSource for DirSource {
    fn list(&self, path: &str) -> Result<Vec<SourceEntry>> {
        let dir = self.resolve(path);
        let read_dir = match std::fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
                return Err(Error::NotFound {
                    path: dir.display().to_string(),
                });
            },
            Err(e) => return Err(Error::read(dir.display().to_string(), e)),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| Error::read(dir.display().to_string(), e))?;
            let child = entry.path();
            // Links are never followed, matching archive extraction.
            let file_type = entry
                .file_type()
                .map_err(|e| Error::read(child.display().to_string(), e))?;
            let kind = if file_type.is_symlink() {
                tracing::warn!(path = %child.display(), "skipping symlink");
                continue;
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                tracing::debug!(path = %child.display(), "skipping special file");
                continue;
            };
            entries.push(SourceEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let file = self.resolve(path);
        std::fs::read(&file).map_err(|e| Error::read(file.display().to_string(), e))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

// ── In-memory tree ──────────────────────────────────────────────────────────

/// Virtual tree held in memory. Directories exist implicitly through the
/// files below them.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any previous content at `path`.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        let path = path.into().trim_matches('/').to_string();
        self.files.insert(path, content.into());
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }
}

impl ContentSource for MemorySource {
    fn list(&self, path: &str) -> Result<Vec<SourceEntry>> {
        let path = path.trim_matches('/');
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };

        let mut children: BTreeMap<&str, EntryKind> = BTreeMap::new();
        for key in self.files.keys().filter(|k| k.starts_with(&prefix)) {
            let rest = &key[prefix.len()..];
            match rest.split_once('/') {
                Some((dir, _)) => children.insert(dir, EntryKind::Dir),
                None => children.insert(rest, EntryKind::File),
            };
        }

        if children.is_empty() && !path.is_empty() {
            return Err(Error::NotFound {
                path: path.to_string(),
            });
        }

        Ok(children
            .into_iter()
            .map(|(name, kind)| SourceEntry {
                name: name.to_string(),
                kind,
            })
            .collect())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .get(path.trim_matches('/'))
            .cloned()
            .ok_or_else(|| Error::read(path, io::ErrorKind::NotFound.into()))
    }

    fn describe(&self) -> String {
        format!("in-memory tree ({} files)", self.files.len())
    }
}

// ── Embedded bundle ─────────────────────────────────────────────────────────

/// A tree compiled into the binary with `include_dir!`.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSource {
    dir: &'static include_dir::Dir<'static>,
}

impl EmbeddedSource {
    pub fn new(dir: &'static include_dir::Dir<'static>) -> Self {
        Self { dir }
    }

    fn dir_at(&self, path: &str) -> Option<&'static include_dir::Dir<'static>> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            Some(self.dir)
        } else {
            self.dir.get_dir(path)
        }
    }
}

impl ContentSource for EmbeddedSource {
    fn list(&self, path: &str) -> Result<Vec<SourceEntry>> {
        let dir = self.dir_at(path).ok_or_else(|| Error::NotFound {
            path: path.to_string(),
        })?;

        let mut entries: Vec<SourceEntry> = dir
            .entries()
            .iter()
            .filter_map(|entry| {
                let name = entry.path().file_name()?.to_string_lossy().into_owned();
                let kind = match entry {
                    include_dir::DirEntry::Dir(_) => EntryKind::Dir,
                    include_dir::DirEntry::File(_) => EntryKind::File,
                };
                Some(SourceEntry { name, kind })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.dir
            .get_file(path.trim_matches('/'))
            .map(|f| f.contents().to_vec())
            .ok_or_else(|| Error::read(path, io::ErrorKind::NotFound.into()))
    }

    fn describe(&self) -> String {
        "embedded bundle".to_string()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    static FIXTURE: include_dir::Dir = include_dir::include_dir!("$CARGO_MANIFEST_DIR/tests/fixtures/bundle");

    fn names(entries: &[SourceEntry]) -> Vec<(&str, EntryKind)> {
        entries.iter().map(|e| (e.name.as_str(), e.kind)).collect()
    }

    #[test]
    fn memory_source_lists_implicit_dirs() {
        let src = MemorySource::new()
            .with_file("skills/b/SKILL.md", "b")
            .with_file("skills/a/SKILL.md", "a")
            .with_file("skills/a.md", "loose")
            .with_file("skills/a/ref/notes.md", "n");

        assert_eq!(
            names(&src.list("skills").unwrap()),
            vec![
                ("a", EntryKind::Dir),
                ("a.md", EntryKind::File),
                ("b", EntryKind::Dir)
            ]
        );
        assert_eq!(names(&src.list("").unwrap()), vec![("skills", EntryKind::Dir)]);
        assert!(matches!(src.list("agents"), Err(Error::NotFound { .. })));
        assert_eq!(src.read("skills/a/SKILL.md").unwrap(), b"a");
        assert!(matches!(src.read("skills/zzz"), Err(Error::Read { .. })));
    }

    #[test]
    fn walk_files_is_depth_first_in_name_order() {
        let src = MemorySource::new()
            .with_file("skills/a/SKILL.md", "a")
            .with_file("skills/a/ref/notes.md", "n")
            .with_file("skills/a/ref/deep/x.txt", "x")
            .with_file("skills/a/README.md", "r");

        assert_eq!(walk_files(&src, "skills/a").unwrap(), vec![
            "skills/a/README.md",
            "skills/a/SKILL.md",
            "skills/a/ref/deep/x.txt",
            "skills/a/ref/notes.md",
        ]);
    }

    #[test]
    fn dir_source_lists_sorted_and_reads() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("skills/zeta")).unwrap();
        std::fs::create_dir_all(tmp.path().join("skills/alpha")).unwrap();
        std::fs::write(tmp.path().join("skills/alpha/SKILL.md"), "---\nname: alpha\n---\n").unwrap();

        let src = DirSource::new(tmp.path());
        assert_eq!(
            names(&src.list("skills").unwrap()),
            vec![("alpha", EntryKind::Dir), ("zeta", EntryKind::Dir)]
        );
        assert_eq!(
            src.read("skills/alpha/SKILL.md").unwrap(),
            b"---\nname: alpha\n---\n"
        );
        assert!(matches!(src.list("missing"), Err(Error::NotFound { .. })));
        assert!(matches!(
            src.list("skills/alpha/SKILL.md"),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(src.read("skills/nope.md"), Err(Error::Read { .. })));
    }

    #[test]
    fn walk_files_filtered_prunes_dirs() {
        let src = MemorySource::new()
            .with_file(".git/HEAD", "ref")
            .with_file("a/SKILL.md", "a")
            .with_file("a/.git/config", "c")
            .with_file("README.md", "r");

        let files = walk_files_filtered(&src, "", &|e| !(e.is_dir() && e.name == ".git")).unwrap();
        assert_eq!(files, vec!["README.md", "a/SKILL.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn dir_source_skips_symlinks() {
        let tmp = tempfile::tempdir().unwrap();
        let unit = tmp.path().join("skills/a");
        std::fs::create_dir_all(&unit).unwrap();
        std::fs::write(unit.join("SKILL.md"), "---\nname: a\n---\n").unwrap();
        std::os::unix::fs::symlink("..", unit.join("loop")).unwrap();
        std::os::unix::fs::symlink("SKILL.md", unit.join("alias.md")).unwrap();

        let src = DirSource::new(tmp.path());
        assert_eq!(names(&src.list("skills/a").unwrap()), vec![(
            "SKILL.md",
            EntryKind::File
        )]);
        assert_eq!(walk_files(&src, "skills").unwrap(), vec!["skills/a/SKILL.md"]);
    }

    #[test]
    fn embedded_source_matches_bundle_layout() {
        let src = EmbeddedSource::new(&FIXTURE);
        let root = src.list("").unwrap();
        assert!(root.iter().any(|e| e.name == "skills" && e.is_dir()));
        assert!(root.iter().any(|e| e.name == "agents" && e.is_dir()));

        let skills = src.list("skills").unwrap();
        assert!(skills.windows(2).all(|w| w[0].name <= w[1].name));
        let manifest = src.read("skills/commit-helper/SKILL.md").unwrap();
        assert!(String::from_utf8_lossy(&manifest).contains("name: commit-helper"));
        assert!(matches!(src.list("nope"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn path_helpers() {
        assert_eq!(join("", "skills"), "skills");
        assert_eq!(join("skills", "a"), "skills/a");
        assert_eq!(base_name("skills/python/pytest"), "pytest");
        assert_eq!(base_name("solo"), "solo");
    }
}
