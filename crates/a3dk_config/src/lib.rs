//! Parsing and validation of `artico3.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`]. [`Project`] pairs that configuration with the directory it
//! was loaded from and resolves every path the export drivers need.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod project;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    find_project_root, load_config, load_config_file, load_config_from_str, CONFIG_FILE,
};
pub use project::Project;
pub use types::*;
