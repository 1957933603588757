//! PowerShell module directories
//!
//! The install base is a pure function of platform family, scope, edition
//! and a few well-known directories, so every combination is testable on
//! any host.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Result, placement};
use crate::manifest::ModuleVersion;

/// Directory name PowerShell searches for modules
pub const MODULES_DIR: &str = "Modules";

/// Shared module location on Unix-like systems
pub const UNIX_ALL_USERS_BASE: &str = "/usr/local/share/powershell/Modules";

/// Who the module is installed for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    #[default]
    CurrentUser,
    AllUsers,
}

/// PowerShell edition whose module path is targeted on Windows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Edition {
    /// PowerShell 6+ (`PowerShell/Modules`)
    #[default]
    Core,
    /// Windows PowerShell 5.1 (`WindowsPowerShell/Modules`)
    Desktop,
}

impl Edition {
    fn dir_name(self) -> &'static str {
        match self {
            Edition::Core => "PowerShell",
            Edition::Desktop => "WindowsPowerShell",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::CurrentUser => "current-user",
            Scope::AllUsers => "all-users",
        })
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Edition::Core => "core",
            Edition::Desktop => "desktop",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Well-known directories of the running user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvPaths {
    pub home: Option<PathBuf>,
    pub documents: Option<PathBuf>,
    pub program_files: Option<PathBuf>,
}

impl EnvPaths {
    pub fn detect() -> Self {
        Self {
            home: dirs::home_dir(),
            documents: dirs::document_dir(),
            program_files: std::env::var_os("ProgramFiles").map(PathBuf::from),
        }
    }
}

/// Module base directory for the given combination
pub fn base_dir(platform: Platform, scope: Scope, edition: Edition, env: &EnvPaths) -> Result<PathBuf> {
    let require = |dir: &Option<PathBuf>, what: &str| {
        dir.clone()
            .ok_or_else(|| placement::unknown_directory(what))
    };

    match (platform, scope) {
        (Platform::Unix, Scope::CurrentUser) => Ok(require(&env.home, "home directory")?
            .join(".local")
            .join("share")
            .join("powershell")
            .join(MODULES_DIR)),
        (Platform::Unix, Scope::AllUsers) => Ok(PathBuf::from(UNIX_ALL_USERS_BASE)),
        (Platform::Windows, Scope::CurrentUser) => Ok(require(&env.documents, "Documents folder")?
            .join(edition.dir_name())
            .join(MODULES_DIR)),
        (Platform::Windows, Scope::AllUsers) => Ok(require(&env.program_files, "Program Files folder")?
            .join(edition.dir_name())
            .join(MODULES_DIR)),
    }
}

/// `base/<module>/<version>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub base: PathBuf,
    pub module_name: String,
    pub version: ModuleVersion,
}

impl Destination {
    pub fn new(base: impl AsRef<Path>, module_name: impl Into<String>, version: ModuleVersion) -> Self {
        Self {
            base: base.as_ref().to_path_buf(),
            module_name: module_name.into(),
            version,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.base
            .join(&self.module_name)
            .join(self.version.as_str())
    }
}
