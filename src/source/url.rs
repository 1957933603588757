//! GitHub reference parsing utilities
//!
//! Splits `owner/repo` shorthands and `https://github.com/...` URLs into
//! their owner, repository and optional branch parts.

/// Hosts accepted as the GitHub web origin
const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// Parts pulled out of a GitHub project URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriParts {
    pub owner: String,
    pub repo: String,
    /// Branch from a `/tree/<branch>` path segment
    pub branch: Option<String>,
}

/// Check if string looks like an `owner/repo` shorthand
pub fn is_github_shorthand(input: &str) -> bool {
    !input.contains("://")
        && !input.starts_with("git@")
        && !input.starts_with('/')
        && !input.ends_with('/')
        && input.matches('/').count() == 1
}

/// Owner and repository names must be plain ASCII path segments
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Strip a trailing `.git` from a repository name
pub fn trim_git_suffix(repo: &str) -> &str {
    repo.strip_suffix(".git").unwrap_or(repo)
}

/// Parse a GitHub project URL: `https://github.com/{owner}/{repo}[.git][/tree/{branch}[/...]]`
///
/// Returns `Err(reason)` when the origin is not GitHub or the path has no owner/repo.
pub fn parse_github_uri(input: &str) -> Result<UriParts, String> {
    let input = input.trim();

    let (scheme, rest) = input
        .split_once("://")
        .ok_or_else(|| "not an absolute URL".to_string())?;

    let (host, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };

    // The default https port names the same origin
    let authority = host.to_ascii_lowercase();
    let host = authority.strip_suffix(":443").unwrap_or(authority.as_str());
    if !scheme.eq_ignore_ascii_case("https") || !GITHUB_HOSTS.contains(&host) {
        return Err("not hosted on github.com".to_string());
    }

    // Drop query string and fragment
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if parts.len() < 2 {
        return Err("URL does not name an owner and repository".to_string());
    }

    let branch = match parts.get(2) {
        Some(&"tree") => parts.get(3).map(|b| b.to_string()),
        _ => None,
    };

    Ok(UriParts {
        owner: parts[0].to_string(),
        repo: trim_git_suffix(parts[1]).to_string(),
        branch,
    })
}
