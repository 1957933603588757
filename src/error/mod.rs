//! Error types and handling for modfetch
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`source`]: Source resolution errors
//! - [`acquisition`]: Download and extraction errors
//! - [`manifest`]: Manifest discovery, validation and repair errors
//! - [`placement`]: Destination and copy errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors
//! - [`cache`]: Temp cache errors

pub mod acquisition;
pub mod cache;
pub mod config;
pub mod fs;
pub mod manifest;
pub mod placement;
pub mod source;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for modfetch operations
#[derive(Error, Diagnostic, Debug)]
pub enum ModfetchError {
    // Source errors
    #[error("No source given")]
    #[diagnostic(
        code(modfetch::source::missing),
        help("Pass a repository as owner/repo or a GitHub URL with --uri")
    )]
    MissingSource,

    #[error("Invalid source '{input}': {reason}")]
    #[diagnostic(
        code(modfetch::source::invalid),
        help("Valid formats: owner/repo, https://github.com/owner/repo")
    )]
    InvalidSource { input: String, reason: String },

    // Acquisition errors
    #[error("Failed to download {url} after {attempts} attempts: {last_response}")]
    #[diagnostic(
        code(modfetch::acquisition::download_failed),
        help("Check the repository and branch names, or pass --token for private repositories")
    )]
    Acquisition {
        url: String,
        last_response: String,
        attempts: u32,
    },

    #[error("Failed to set up the HTTP client: {reason}")]
    #[diagnostic(code(modfetch::acquisition::client_failed))]
    HttpClient { reason: String },

    #[error("Failed to extract archive {path}: {reason}")]
    #[diagnostic(code(modfetch::acquisition::extraction_failed))]
    Extraction { path: String, reason: String },

    // Manifest errors
    #[error("No module manifest (.psd1) found under {root}")]
    #[diagnostic(
        code(modfetch::manifest::not_found),
        help("A module without a manifest cannot be installed into a versioned directory")
    )]
    NoManifest { root: String },

    #[error("Manifest validation failed for {path}: {reason}")]
    #[diagnostic(code(modfetch::manifest::invalid))]
    ManifestValidation { path: String, reason: String },

    #[error("Failed to repair manifest {path}: {reason}")]
    #[diagnostic(
        code(modfetch::manifest::repair_failed),
        help("Fix the manifest in the repository; it could not be rebuilt automatically")
    )]
    ManifestRepair { path: String, reason: String },

    #[error("Invalid module version: {input}")]
    #[diagnostic(
        code(modfetch::manifest::invalid_version),
        help("Versions have two to four numeric parts, e.g. 1.2.3")
    )]
    InvalidVersion { input: String },

    // Placement errors
    #[error("Failed to place {path}: {reason}")]
    #[diagnostic(code(modfetch::placement::copy_failed))]
    Placement { path: String, reason: String },

    #[error("Could not determine the {what} directory")]
    #[diagnostic(
        code(modfetch::placement::unknown_directory),
        help("Pass an explicit --destination")
    )]
    UnknownDirectory { what: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(modfetch::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(modfetch::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(modfetch::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(modfetch::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(modfetch::fs::io_error))]
    IoError { message: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(modfetch::cache::operation_failed))]
    CacheOperationFailed { message: String },
}

impl From<std::io::Error> for ModfetchError {
    fn from(err: std::io::Error) -> Self {
        ModfetchError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ModfetchError {
    fn from(err: serde_yaml::Error) -> Self {
        ModfetchError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ModfetchError {
    fn from(err: serde_json::Error) -> Self {
        ModfetchError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for ModfetchError {
    fn from(err: zip::result::ZipError) -> Self {
        ModfetchError::Extraction {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<walkdir::Error> for ModfetchError {
    fn from(err: walkdir::Error) -> Self {
        ModfetchError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ModfetchError>;
