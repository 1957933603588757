//! Installation pipeline for PowerShell modules
//!
//! This module handles:
//! - Orchestration of installation stages (Resolve → Download → Extract → Manifest → Place)
//! - Progress tracking at each stage
//! - Cleanup of the downloaded archive once the module is in place
//!
//! The pipeline owns no global state: settings arrive as an [`InstallConfig`],
//! the per-run choices as an [`InstallRequest`], and HTTP goes through the
//! [`Transport`] it is given.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::acquisition::{self, ArchiveUrls, Transport};
use crate::config::InstallConfig;
use crate::error::{ModfetchError, Result, source as source_error};
use crate::hash::ContentHash;
use crate::manifest::{self, Manifest, ModuleVersion};
use crate::placement::{self, Destination, Edition, EnvPaths, Platform, Scope};
use crate::source::{self, ResolvedSource, SourceRef, url};
use crate::ui::{ProgressReporter, Stage};

#[cfg(test)]
mod tests;

/// One install, built from CLI arguments and config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub source: SourceRef,
    /// Explicit branch; wins over a `/tree/<branch>` URL segment
    pub branch: Option<String>,
    /// Defaults to the repository name
    pub module_name: Option<String>,
    pub scope: Scope,
    pub edition: Edition,
    /// Replaces the scope-derived base directory
    pub destination: Option<PathBuf>,
    pub auth_token: Option<String>,
    /// Version to use when the manifest must be rebuilt without one
    pub assert_version: Option<ModuleVersion>,
}

#[cfg(test)]
impl InstallRequest {
    pub fn new(source: SourceRef) -> Self {
        Self {
            source,
            branch: None,
            module_name: None,
            scope: Scope::default(),
            edition: Edition::default(),
            destination: None,
            auth_token: None,
            assert_version: None,
        }
    }
}

/// What an install did
#[derive(Debug)]
pub struct InstallOutcome {
    pub source: ResolvedSource,
    pub module_name: String,
    pub path: PathBuf,
    pub content_hash: ContentHash,
    pub manifest: Manifest,
    pub files: usize,
    /// Non-fatal problems (per-file copy failures)
    pub warnings: Vec<ModfetchError>,
}

impl InstallOutcome {
    pub fn version(&self) -> &ModuleVersion {
        &self.manifest.version
    }
}

/// Installation pipeline for orchestrating module installation
pub struct InstallPipeline<'a> {
    config: &'a InstallConfig,
    transport: &'a dyn Transport,
    platform: Platform,
    env: EnvPaths,
    progress: Option<&'a mut dyn ProgressReporter>,
}

impl<'a> InstallPipeline<'a> {
    pub fn new(config: &'a InstallConfig, transport: &'a dyn Transport) -> Self {
        Self {
            config,
            transport,
            platform: Platform::current(),
            env: EnvPaths::detect(),
            progress: None,
        }
    }

    /// Target a specific platform family and set of well-known directories
    #[cfg(test)]
    pub fn with_platform(mut self, platform: Platform, env: EnvPaths) -> Self {
        self.platform = platform;
        self.env = env;
        self
    }

    pub fn with_progress(mut self, progress: &'a mut dyn ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run every stage for `request`
    pub fn install(&mut self, request: &InstallRequest) -> Result<InstallOutcome> {
        let result = self.run(request);
        if let Some(progress) = self.progress.as_mut() {
            match result {
                Ok(_) => progress.finish(),
                Err(_) => progress.abandon(),
            }
        }
        result
    }

    fn report_stage(&mut self, stage: Stage, detail: &str) {
        debug!(stage = ?stage, detail, "install stage");
        if let Some(progress) = self.progress.as_mut() {
            progress.stage(stage, detail);
        }
    }

    fn run(&mut self, request: &InstallRequest) -> Result<InstallOutcome> {
        self.report_stage(Stage::Resolve, "");
        let resolved = source::resolve(
            &request.source,
            request.branch.as_deref(),
            &self.config.default_branch,
        )?;

        let module_name = match &request.module_name {
            Some(name) if !url::is_valid_segment(name) => {
                return Err(source_error::invalid(
                    name,
                    "module name must be a single path segment",
                ));
            }
            Some(name) => name.clone(),
            None => resolved.repo.clone(),
        };

        let base = match &request.destination {
            Some(dir) => dir.clone(),
            None => placement::base_dir(self.platform, request.scope, request.edition, &self.env)?,
        };

        self.report_stage(Stage::Download, &resolved.to_string());
        let urls = ArchiveUrls::new(&resolved, self.config);
        let fetched = acquisition::fetch(
            self.transport,
            &urls,
            request.auth_token.as_deref(),
            &self.config.temp_root,
        )?;

        self.report_stage(Stage::Extract, &fetched.content_hash.prefixed());
        let tree = acquisition::extract_snapshot(&fetched, &self.config.temp_root)?;

        self.report_stage(Stage::Manifest, &module_name);
        let manifest =
            manifest::resolve_manifest(&tree.root, &module_name, request.assert_version.as_ref())?;

        let destination = Destination::new(base, module_name.as_str(), manifest.version.clone());
        self.report_stage(Stage::Place, &destination.path().display().to_string());
        let placed = placement::place(self.platform, &tree, &manifest, &destination)?;

        if let Err(e) = fs::remove_file(&fetched.archive_path) {
            warn!(path = %fetched.archive_path.display(), error = %e, "could not remove archive");
        }

        Ok(InstallOutcome {
            source: resolved,
            module_name,
            path: placed.path,
            content_hash: fetched.content_hash,
            manifest,
            files: placed.copied,
            warnings: placed.failures,
        })
    }
}
