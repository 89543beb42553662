//! Skill packages: discovery, filtering, acquisition and installation.
//!
//! A skill is a directory holding a `SKILL.md` manifest with a frontmatter
//! header plus any auxiliary files. Skills are read from a [`ContentSource`]
//! (embedded bundle, local directory, git clone or tarball) and written to a
//! destination directory through a policy-driven [`Writer`].

pub mod discover;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod install;
pub mod parse;
pub mod source;
pub mod template;
pub mod types;
pub mod writer;

#[cfg(test)]
mod test_http;

pub use {
    error::{Error, Result},
    fetch::{FetchOptions, SourceLocator},
    filter::Filter,
    install::Installer,
    source::{ContentSource, DirSource, EmbeddedSource, MemorySource},
    types::{FlatItem, Skill, SkillMetadata, WritePolicy, WriteResult},
    writer::Writer,
};
