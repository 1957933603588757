//! Placement of a resolved module into a PowerShell module path

pub mod copy;
pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::acquisition::ExtractedTree;
use crate::error::{ModfetchError, Result, fs as fs_error};
use crate::manifest::Manifest;

pub use paths::{Destination, Edition, EnvPaths, Platform, Scope, base_dir};

/// Result of placing a module
#[derive(Debug)]
pub struct Placement {
    pub path: PathBuf,
    pub copied: usize,
    /// Per-file copy failures, reported as warnings
    pub failures: Vec<ModfetchError>,
}

/// Directory whose contents are installed.
///
/// Unix installs the whole snapshot; Windows installs the folder holding the
/// manifest.
pub fn copy_root<'a>(platform: Platform, tree: &'a ExtractedTree, manifest: &'a Manifest) -> &'a Path {
    match platform {
        Platform::Unix => tree.content_root.as_path(),
        Platform::Windows => manifest.dir(),
    }
}

/// Copy the module into `destination`
pub fn place(
    platform: Platform,
    tree: &ExtractedTree,
    manifest: &Manifest,
    destination: &Destination,
) -> Result<Placement> {
    let path = destination.path();
    fs::create_dir_all(&path).map_err(|e| fs_error::write_error(&path, e))?;

    let root = copy_root(platform, tree, manifest);
    debug!(from = %root.display(), to = %path.display(), "copying module files");

    let report = copy::copy_tree(root, &path)?;
    info!(
        module = %destination.module_name,
        version = %destination.version,
        files = report.copied,
        failures = report.failures.len(),
        "placed module"
    );

    Ok(Placement {
        path,
        copied: report.copied,
        failures: report.failures,
    })
}
