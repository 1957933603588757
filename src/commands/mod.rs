//! Command implementations for modfetch CLI

pub mod cache;
pub mod completions;
pub mod install;
pub mod version;

use std::path::Path;

use crate::config::{FileConfig, InstallConfig};
use crate::error::Result;

/// Effective settings from the config file (explicit or default location)
pub(crate) fn load_config(config_path: Option<&Path>) -> Result<InstallConfig> {
    Ok(InstallConfig::from_file(FileConfig::load(config_path)?))
}
