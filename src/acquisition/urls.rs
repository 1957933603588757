//! Archive URL builder
//!
//! GitHub serves a branch snapshot from two places: the REST API zipball
//! endpoint (which redirects to codeload) and the web archive link.

use std::fmt;

use crate::config::InstallConfig;
use crate::source::ResolvedSource;

/// Which archive endpoint an attempt talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `{api}/repos/{owner}/{repo}/zipball/{branch}`
    ApiZipball,
    /// `{web}/{owner}/{repo}/archive/{branch}.zip`
    WebArchive,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::ApiZipball => f.write_str("api zipball"),
            Endpoint::WebArchive => f.write_str("web archive"),
        }
    }
}

/// Builds snapshot URLs for one resolved source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveUrls {
    api_base: String,
    web_base: String,
    owner: String,
    repo: String,
    branch: String,
}

impl ArchiveUrls {
    pub fn new(source: &ResolvedSource, config: &InstallConfig) -> Self {
        Self::with_bases(source, &config.api_base, &config.web_base)
    }

    pub fn with_bases(source: &ResolvedSource, api_base: &str, web_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            web_base: web_base.trim_end_matches('/').to_string(),
            owner: source.owner.clone(),
            repo: source.repo.clone(),
            branch: encode_branch(&source.branch),
        }
    }

    /// URL for the given endpoint
    pub fn url(&self, endpoint: Endpoint) -> String {
        match endpoint {
            Endpoint::ApiZipball => format!(
                "{}/repos/{}/{}/zipball/{}",
                self.api_base, self.owner, self.repo, self.branch
            ),
            Endpoint::WebArchive => format!(
                "{}/{}/{}/archive/{}.zip",
                self.web_base, self.owner, self.repo, self.branch
            ),
        }
    }
}

/// Percent-encode the characters of a branch name that are not URL path safe.
/// Slashes stay as they are; GitHub resolves `feature/x` style refs in both endpoints.
fn encode_branch(branch: &str) -> String {
    let mut out = String::with_capacity(branch.len());
    for b in branch.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
