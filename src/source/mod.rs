//! Repository source resolution
//!
//! Turns the user's repository reference into a canonical `(owner, repo, branch)`:
//! - GitHub short-form: `owner/repo`
//! - GitHub project URLs: `https://github.com/owner/repo`
//! - GitHub web UI URLs: `https://github.com/owner/repo/tree/branch`
//!
//! Exactly one of the two forms drives resolution.

pub mod url;

use std::fmt;

use tracing::debug;

use crate::error::{ModfetchError, Result, source};

/// Branch used when neither the caller nor the URL names one
pub const DEFAULT_BRANCH: &str = "master";

/// Where the caller said the module lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// `owner/repo`
    Repo(String),
    /// Full project URL
    Uri(String),
}

impl SourceRef {
    /// Build from the two optional CLI inputs; exactly one must be present
    pub fn from_parts(repo: Option<String>, uri: Option<String>) -> Result<Self> {
        match (repo, uri) {
            (Some(repo), None) => Ok(SourceRef::Repo(repo)),
            (None, Some(uri)) => Ok(SourceRef::Uri(uri)),
            (None, None) => Err(ModfetchError::MissingSource),
            (Some(repo), Some(uri)) => Err(source::invalid(
                format!("{repo} / {uri}"),
                "give either a repository or a URI, not both",
            )),
        }
    }
}

/// A repository snapshot identified on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl ResolvedSource {
    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for ResolvedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

/// Resolve a source reference into owner, repo and branch
///
/// `branch` is the caller's explicit branch; it wins over a `/tree/<branch>` URL segment.
/// `default_branch` applies when neither names one.
pub fn resolve(
    source_ref: &SourceRef,
    branch: Option<&str>,
    default_branch: &str,
) -> Result<ResolvedSource> {
    let (input, owner, repo, url_branch) = match source_ref {
        SourceRef::Repo(input) => {
            let input = input.trim();
            if !url::is_github_shorthand(input) {
                return Err(source::invalid(input, "expected owner/repo"));
            }
            let (owner, repo) = input.split_once('/').unwrap_or((input, ""));
            (input, owner.to_string(), url::trim_git_suffix(repo).to_string(), None)
        }
        SourceRef::Uri(input) => {
            let parts =
                url::parse_github_uri(input).map_err(|reason| source::invalid(input.as_str(), reason))?;
            (input.as_str(), parts.owner, parts.repo, parts.branch)
        }
    };

    if !url::is_valid_segment(&owner) {
        return Err(source::invalid(input, format!("invalid owner '{owner}'")));
    }
    if !url::is_valid_segment(&repo) {
        return Err(source::invalid(input, format!("invalid repository '{repo}'")));
    }

    let branch = branch
        .map(str::to_string)
        .or(url_branch)
        .unwrap_or_else(|| default_branch.to_string());

    if branch.trim().is_empty() {
        return Err(source::invalid(input, "branch name is empty"));
    }

    let resolved = ResolvedSource {
        owner,
        repo,
        branch,
    };
    debug!(source = %resolved, "resolved source");
    Ok(resolved)
}
