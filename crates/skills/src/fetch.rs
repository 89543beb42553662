//! Remote and local acquisition of content trees.
//!
//! A [`SourceLocator`] names where skills come from. [`acquire`] turns it into
//! a directory on disk: local paths are used in place, git repositories are
//! shallow-cloned and tarballs are streamed into a scoped temporary directory
//! that lives as long as the returned [`Acquired`].

use std::{
    ffi::OsStr,
    fmt,
    io::{self, Read},
    path::{Component, Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use {
    futures::TryStreamExt,
    tokio_util::io::{StreamReader, SyncIoBridge},
};

use crate::{
    error::{Context, Error, Result},
    source::DirSource,
};

/// Hosts whose `http(s)` URLs are cloned with git rather than downloaded.
pub const GIT_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org", "codeberg.org"];

const TEMP_PREFIX: &str = "skillport-";

/// Where a content tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    Local(PathBuf),
    Git(String),
    Tarball(String),
}

impl SourceLocator {
    /// Classify a user-supplied string.
    ///
    /// `http(s)` URLs on a known git host are git remotes, other `http(s)`
    /// URLs are gzip tarballs, anything else is a local path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            if GIT_HOSTS.iter().any(|host| raw.contains(host)) {
                Self::Git(raw.to_string())
            } else {
                Self::Tarball(raw.to_string())
            }
        } else {
            Self::Local(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Git(url) | Self::Tarball(url) => f.write_str(url),
        }
    }
}

/// Network limits for acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub clone_timeout: Duration,
    pub download_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            clone_timeout: Duration::from_secs(120),
            download_timeout: Duration::from_secs(300),
            user_agent: concat!("skillport/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// An acquired content tree. Temporary trees are removed on drop.
#[derive(Debug)]
pub struct Acquired {
    root: PathBuf,
    workdir: Option<tempfile::TempDir>,
}

impl Acquired {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the tree lives in a temporary directory owned by this value.
    pub fn is_temporary(&self) -> bool {
        self.workdir.is_some()
    }

    pub fn source(&self) -> DirSource {
        DirSource::new(&self.root)
    }
}

/// Materialize `locator` as a directory on disk.
pub async fn acquire(locator: &SourceLocator, opts: &FetchOptions) -> Result<Acquired> {
    match locator {
        SourceLocator::Local(path) => {
            if !path.is_dir() {
                return Err(Error::NotFound {
                    path: path.display().to_string(),
                });
            }
            Ok(Acquired {
                root: path.clone(),
                workdir: None,
            })
        },
        SourceLocator::Git(url) => clone_repo(url, opts).await,
        SourceLocator::Tarball(url) => download_tarball(url, opts).await,
    }
}

fn workdir() -> Result<tempfile::TempDir> {
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempdir()
        .map_err(|e| Error::write(std::env::temp_dir(), e))
}

async fn clone_repo(url: &str, opts: &FetchOptions) -> Result<Acquired> {
    let workdir = workdir()?;
    let checkout = workdir.path().to_path_buf();
    tracing::info!(%url, "cloning repository");

    let mut cmd = tokio::process::Command::new("git");
    cmd.args(["clone", "--depth", "1", url])
        .arg(&checkout)
        .stdin(Stdio::null())
        .env("GIT_TERMINAL_PROMPT", "0")
        .kill_on_drop(true);

    let output = match tokio::time::timeout(opts.clone_timeout, cmd.output()).await {
        Ok(result) => result.map_err(|e| Error::Clone {
            url: url.to_string(),
            output: format!("failed to run git: {e}"),
        })?,
        Err(_) => {
            return Err(Error::Timeout {
                what: format!("git clone {url}"),
                after: opts.clone_timeout,
            });
        },
    };

    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(Error::Clone {
            url: url.to_string(),
            output: combined.trim().to_string(),
        });
    }

    let skills = checkout.join("skills");
    let root = if skills.is_dir() {
        skills
    } else {
        checkout
    };
    tracing::debug!(root = %root.display(), "clone complete");

    Ok(Acquired {
        root,
        workdir: Some(workdir),
    })
}

async fn download_tarball(url: &str, opts: &FetchOptions) -> Result<Acquired> {
    let download_error = |source: reqwest::Error| {
        if source.is_timeout() {
            Error::Timeout {
                what: format!("download {url}"),
                after: opts.download_timeout,
            }
        } else {
            Error::Download {
                url: url.to_string(),
                source,
            }
        }
    };

    let client = reqwest::Client::builder()
        .timeout(opts.download_timeout)
        .user_agent(opts.user_agent.as_str())
        .build()
        .map_err(download_error)?;

    tracing::info!(%url, "downloading tarball");
    let resp = client.get(url).send().await.map_err(download_error)?;
    if resp.status() != reqwest::StatusCode::OK {
        return Err(Error::DownloadStatus {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }

    let workdir = workdir()?;
    let dest = workdir.path().to_path_buf();

    let body = Box::pin(resp.bytes_stream().map_err(io::Error::other));
    let reader = SyncIoBridge::new(StreamReader::new(body));
    let origin = url.to_string();

    tokio::task::spawn_blocking(move || extract_tar_gz(reader, &dest, &origin))
        .await
        .context("archive extraction task failed")??;

    tracing::debug!(%url, root = %workdir.path().display(), "tarball extracted");
    Ok(Acquired {
        root: workdir.path().to_path_buf(),
        workdir: Some(workdir),
    })
}

/// Extract a gzip-compressed tar stream below `dest`.
///
/// `origin` names the archive in errors. Entries whose cleaned path leaves
/// `dest` abort the extraction with [`Error::IllegalArchivePath`]. Only
/// directories and regular files are materialized; links and special files
/// are skipped.
pub fn extract_tar_gz<R: Read>(reader: R, dest: &Path, origin: &str) -> Result<()> {
    std::fs::create_dir_all(dest).map_err(|e| Error::write(dest, e))?;
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(reader));
    let corrupt = |at: String| {
        move |source: io::Error| Error::Extract {
            origin: at,
            source,
        }
    };

    let mut previous: Option<PathBuf> = None;
    for entry in archive.entries().map_err(corrupt(origin.to_string()))? {
        let at = match &previous {
            Some(path) => format!("{origin} (after {})", path.display()),
            None => origin.to_string(),
        };
        let mut entry = entry.map_err(corrupt(at.clone()))?;
        let entry_path = entry.path().map_err(corrupt(at))?.into_owned();
        previous = Some(entry_path.clone());
        let target = clean_join(dest, &entry_path)?;
        let kind = entry.header().entry_type();

        if kind.is_pax_global_extensions() {
            continue;
        }

        if kind.is_dir() {
            create_dir(&target)?;
            continue;
        }

        if !kind.is_file() {
            tracing::warn!(entry = %entry_path.display(), ?kind, "skipping non-regular archive entry");
            continue;
        }

        if target == dest {
            continue;
        }
        if let Some(parent) = target.parent() {
            create_dir(parent)?;
        }

        let mode = entry.header().mode().unwrap_or(0o644);
        let mut file = open_file(&target, mode).map_err(|e| Error::write(&target, e))?;
        io::copy(&mut entry, &mut file).map_err(|e| Error::write(&target, e))?;
    }
    Ok(())
}

/// Lexically join a relative path onto `dest`, refusing to climb above it.
pub(crate) fn clean_join(dest: &Path, entry: &Path) -> Result<PathBuf> {
    let illegal = || Error::IllegalArchivePath {
        entry: entry.to_path_buf(),
    };

    let mut parts: Vec<&OsStr> = Vec::new();
    for component in entry.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {},
            Component::ParentDir => {
                parts.pop().ok_or_else(illegal)?;
            },
            Component::RootDir | Component::Prefix(_) => return Err(illegal()),
        }
    }

    let mut joined = dest.to_path_buf();
    joined.extend(parts);
    Ok(joined)
}

fn create_dir(path: &Path) -> Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path).map_err(|e| Error::write(path, e))
}

fn open_file(path: &Path, mode: u32) -> io::Result<std::fs::File> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    options.open(path)
}
