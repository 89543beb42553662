use std::{path::PathBuf, time::Duration};

use skillport_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manifest header block has no `name:` field.
    #[error("skill manifest is missing a name in its frontmatter")]
    MissingName,

    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cloning {url}: {output}")]
    Clone { url: String, output: String },

    #[error("downloading {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("downloading {url}: status {status}")]
    DownloadStatus { url: String, status: u16 },

    #[error("extracting {origin}: {source}")]
    Extract {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("path escapes the destination root: {}", entry.display())]
    IllegalArchivePath { entry: PathBuf },

    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{what} timed out after {}s", after.as_secs())]
    Timeout { what: String, after: Duration },

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn read(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

skillport_common::impl_context!();
