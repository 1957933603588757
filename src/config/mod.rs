//! Configuration handling for modfetch
//!
//! Settings come from (highest precedence first) CLI flags, environment
//! variables, the optional `config.yaml`, and built-in defaults. The result is
//! an [`InstallConfig`] that is passed explicitly into the install pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, config};
use crate::placement::{Edition, Scope};
use crate::source::DEFAULT_BRANCH;

/// Config file name under the user's config directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Application directory name under the user's config directory
const CONFIG_DIR: &str = "modfetch";

/// GitHub REST API origin
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub web origin
pub const DEFAULT_WEB_BASE: &str = "https://github.com";

/// Default total request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// On-disk configuration (`config.yaml`); every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<Edition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_base: Option<String>,
}

impl FileConfig {
    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file deserializes to null
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from an explicit path, or the default location when `path` is `None`.
    ///
    /// A missing default file yields the empty config; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() && !explicit {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| config::read_failed(path.display().to_string(), e.to_string()))?;

        debug!(path = %path.display(), "loaded configuration file");

        Self::from_yaml(&content)
            .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))
    }
}

/// Default config location: `<config dir>/modfetch/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Effective settings for one install run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    pub default_scope: Scope,
    pub default_edition: Edition,
    pub default_branch: String,
    pub timeout: Duration,
    pub temp_root: PathBuf,
    pub api_base: String,
    pub web_base: String,
}

impl InstallConfig {
    /// Merge the file config over built-in defaults
    pub fn from_file(file: FileConfig) -> Self {
        Self {
            default_scope: file.scope.unwrap_or_default(),
            default_edition: file.edition.unwrap_or_default(),
            default_branch: file.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            temp_root: crate::temp::temp_root(file.temp_dir.as_deref()),
            api_base: trim_base(file.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)),
            web_base: trim_base(file.web_base.as_deref().unwrap_or(DEFAULT_WEB_BASE)),
        }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self::from_file(FileConfig::default())
    }
}

fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}
