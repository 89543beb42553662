//! Configuration loading and env substitution.
//!
//! Config files: `.skillport.{yaml,yml,toml,json}` (or the legacy
//! `.skill-installer.{yaml,yml}`), searched in the project directory and then
//! in the user config directory (`~/.config/skillport/`).
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{discover_and_load, find_config_file, load_config, user_config_dir},
    schema::{FetchConfig, SkillportConfig},
};
