//! Idempotent file writer with skip / force / dry-run policy.

use std::{io::Write as _, path::Path};

use crate::{
    error::{Error, Result},
    types::{WritePolicy, WriteResult},
};

/// Writes files under a [`WritePolicy`].
///
/// Decision order: an existing file is skipped unless `force` is set, a dry
/// run only reports, and everything else is written through a sibling temp
/// file that is renamed into place so the destination is never left partial.
#[derive(Debug, Clone, Copy, Default)]
pub struct Writer {
    policy: WritePolicy,
}

impl Writer {
    pub fn new(policy: WritePolicy) -> Self {
        Self { policy }
    }

    pub fn write(&self, path: &Path, content: &[u8]) -> Result<WriteResult> {
        let exists = path.exists() && !path.is_dir();

        if exists && !self.policy.force {
            tracing::debug!(path = %path.display(), "skipping existing file");
            return Ok(WriteResult::Skipped(path.to_path_buf()));
        }

        if self.policy.dry_run {
            return Ok(if exists {
                WriteResult::WouldUpdate(path.to_path_buf())
            } else {
                WriteResult::WouldCreate(path.to_path_buf())
            });
        }

        write_atomic(path, content)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");

        Ok(if exists {
            WriteResult::Updated(path.to_path_buf())
        } else {
            WriteResult::Created(path.to_path_buf())
        })
    }
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;

    // Dropping the temp file on an early return removes it.
    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| Error::write(path, e))?;
    tmp.write_all(content).map_err(|e| Error::write(path, e))?;
    tmp.as_file().sync_all().map_err(|e| Error::write(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(|e| Error::write(path, e))?;
    }

    tmp.persist(path).map_err(|e| Error::write(path, e.error))?;
    Ok(())
}
