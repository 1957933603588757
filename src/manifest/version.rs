//! Module version numbers
//!
//! PowerShell module versions follow `System.Version`: two to four
//! dot-separated non-negative integers. The source text is kept so a
//! version is written back exactly as declared.

use std::fmt;
use std::str::FromStr;

use crate::error::{ModfetchError, manifest};

/// Version used when neither the manifest nor the caller supplies one
pub const DEFAULT_VERSION: &str = "0.5.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleVersion {
    raw: String,
}

impl ModuleVersion {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The fallback version
    pub fn default_version() -> Self {
        Self {
            raw: DEFAULT_VERSION.to_string(),
        }
    }
}

impl FromStr for ModuleVersion {
    type Err = ModfetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let parts: Vec<&str> = raw.split('.').collect();
        let well_formed = (2..=4).contains(&parts.len())
            && parts.iter().all(|p| {
                !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) && p.parse::<u32>().is_ok()
            });

        if well_formed {
            Ok(Self {
                raw: raw.to_string(),
            })
        } else {
            Err(manifest::invalid_version(s))
        }
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
