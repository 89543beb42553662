//! Installation flows: discovered skills, flat agent/command files, and
//! mirrored trees from acquired sources.

use std::path::{Path, PathBuf};

use crate::{
    discover::{self, AGENTS_DIR, COMMANDS_DIR, SKILLS_DIR},
    error::{Context, Result},
    fetch::{self, FetchOptions, SourceLocator},
    filter::Filter,
    source::{self, ContentSource},
    types::{FlatItem, Skill, WriteResult},
    writer::Writer,
};

/// Maps a source file name to its installed file name.
pub type RenameFn = fn(&str) -> String;

/// GitHub Copilot expects agent files named `<name>.agent.md`.
pub fn copilot_agent_name(file_name: &str) -> String {
    match file_name.strip_suffix(".md") {
        Some(stem) if !stem.ends_with(".agent") => format!("{stem}.agent.md"),
        _ => file_name.to_string(),
    }
}

/// Installs content from a [`ContentSource`] through a [`Writer`].
pub struct Installer<'a> {
    source: &'a dyn ContentSource,
    writer: Writer,
}

impl<'a> Installer<'a> {
    pub fn new(source: &'a dyn ContentSource, writer: Writer) -> Self {
        Self { source, writer }
    }

    /// Every skill in the source, in discovery order.
    pub fn list_skills(&self) -> Result<Vec<Skill>> {
        discover::discover(self.source)
    }

    pub fn list_agents(&self) -> Result<Vec<FlatItem>> {
        discover::discover_flat(self.source, AGENTS_DIR)
    }

    pub fn list_commands(&self) -> Result<Vec<FlatItem>> {
        discover::discover_flat(self.source, COMMANDS_DIR)
    }

    /// Install every skill selected by `filter` into `dest`.
    ///
    /// Each file keeps its path relative to `skills/`, so a pack skill lands
    /// at `dest/<pack>/<skill>/...`. The first failure aborts the install.
    pub fn install_skills(&self, dest: &Path, filter: &Filter) -> Result<Vec<WriteResult>> {
        let skills = discover::discover(self.source)?;
        let total = skills.len();

        let mut results = Vec::new();
        let mut installed = 0usize;
        for skill in skills.iter().filter(|s| filter.matches(s)) {
            for file in source::walk_files(self.source, &skill.root)? {
                let content = self.source.read(&file)?;
                let relative = file
                    .strip_prefix(SKILLS_DIR)
                    .and_then(|rest| rest.strip_prefix('/'))
                    .unwrap_or(&file);
                results.push(self.writer.write(&dest_path(dest, relative)?, &content)?);
            }
            installed += 1;
        }

        tracing::info!(
            selected = installed,
            total,
            files = results.len(),
            dest = %dest.display(),
            "installed skills"
        );
        Ok(results)
    }

    /// Install agent definitions from `agents/` into `dest`.
    pub fn install_agents(
        &self,
        dest: &Path,
        filter: &Filter,
        rename: Option<RenameFn>,
    ) -> Result<Vec<WriteResult>> {
        self.install_flat(AGENTS_DIR, dest, filter, rename)
    }

    /// Install slash commands from `commands/` into `dest`.
    pub fn install_commands(
        &self,
        dest: &Path,
        filter: &Filter,
        rename: Option<RenameFn>,
    ) -> Result<Vec<WriteResult>> {
        self.install_flat(COMMANDS_DIR, dest, filter, rename)
    }

    fn install_flat(
        &self,
        root: &str,
        dest: &Path,
        filter: &Filter,
        rename: Option<RenameFn>,
    ) -> Result<Vec<WriteResult>> {
        let mut results = Vec::new();
        for item in discover::discover_flat(self.source, root)?
            .iter()
            .filter(|item| filter.matches_item(item))
        {
            let content = self.source.read(&item.path)?;
            let file_name = match rename {
                Some(rename) => rename(&item.file_name),
                None => item.file_name.clone(),
            };
            results.push(self.writer.write(&dest_path(dest, &file_name)?, &content)?);
        }

        tracing::info!(%root, files = results.len(), dest = %dest.display(), "installed files");
        Ok(results)
    }
}

/// `dest` joined with a slash-separated source path. Paths that climb above
/// `dest` or are absolute fail with `IllegalArchivePath`.
fn dest_path(dest: &Path, relative: &str) -> Result<PathBuf> {
    fetch::clean_join(dest, Path::new(relative))
}

/// Mirror every file of `source` into `dest`, keeping relative paths.
/// `.git` directories are skipped. No manifest parsing or filtering.
pub fn install_tree(
    source: &dyn ContentSource,
    dest: &Path,
    writer: &Writer,
) -> Result<Vec<WriteResult>> {
    let files = source::walk_files_filtered(source, "", &|e| !(e.is_dir() && e.name == ".git"))?;

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let content = source.read(&file)?;
        results.push(writer.write(&dest_path(dest, &file)?, &content)?);
    }
    tracing::debug!(source = %source.describe(), files = results.len(), "mirrored tree");
    Ok(results)
}

/// Acquire `locator` and mirror its tree into `dest`.
///
/// Temporary checkouts are removed once the copy finishes or fails.
pub async fn install_from_source(
    locator: &SourceLocator,
    dest: &Path,
    writer: &Writer,
    opts: &FetchOptions,
) -> Result<Vec<WriteResult>> {
    let acquired = fetch::acquire(locator, opts).await?;
    tracing::info!(
        source = %locator,
        root = %acquired.root().display(),
        temporary = acquired.is_temporary(),
        dest = %dest.display(),
        "installing from source"
    );

    let dest = dest.to_path_buf();
    let writer = *writer;
    let results = tokio::task::spawn_blocking(move || install_tree(&acquired.source(), &dest, &writer))
        .await
        .context("install task failed")??;

    tracing::info!(files = results.len(), source = %locator, "installed from source");
    Ok(results)
}
