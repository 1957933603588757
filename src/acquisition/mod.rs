//! Snapshot acquisition
//!
//! Downloads a branch zipball, tries the web archive link once when the API
//! endpoint fails, hashes the bytes and extracts them into a directory named
//! after the hash:
//!
//! ```text
//! <temp root>/<hash>.zip      downloaded archive (removed after install)
//! <temp root>/<hash>/         extracted snapshot (kept, keyed by content)
//! ```
//!
//! Identical snapshots therefore share one extraction directory, and
//! different snapshots never collide.

pub mod extract;
pub mod retry;
pub mod transport;
pub mod urls;
pub mod zone;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, acquisition, fs as fs_error};
use crate::hash::{self, ContentHash};

pub use transport::{HttpTransport, Transport};
pub use urls::ArchiveUrls;

/// A downloaded archive on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub archive_path: PathBuf,
    pub content_hash: ContentHash,
}

/// Extracted snapshot contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTree {
    /// `<temp root>/<hash>`
    pub root: PathBuf,
    /// The single top-level folder of the archive, or `root` for flat archives
    pub content_root: PathBuf,
}

/// Extraction directory for a content hash
pub fn extraction_dir(temp_root: &Path, hash: &ContentHash) -> PathBuf {
    temp_root.join(hash.hex())
}

/// Download the snapshot for `source` into `temp_root`
pub fn fetch(
    transport: &dyn Transport,
    urls: &ArchiveUrls,
    token: Option<&str>,
    temp_root: &Path,
) -> Result<FetchResult> {
    let downloaded = retry::run(|attempt| {
        let url = urls.url(attempt.endpoint);
        debug!(attempt = attempt.number, endpoint = %attempt.endpoint, url = %url, "downloading archive");
        match transport.get(&url, token) {
            Ok(bytes) => Ok((url, bytes)),
            Err(e) => {
                warn!(attempt = attempt.number, url = %url, error = %e, "download attempt failed");
                Err(e)
            }
        }
    });

    let (url, bytes) = downloaded.map_err(|exhausted| {
        acquisition::download_failed(
            urls.url(exhausted.last.endpoint),
            exhausted.error.to_string(),
            exhausted.attempts,
        )
    })?;

    let content_hash = hash::hash_bytes(&bytes);

    fs::create_dir_all(temp_root).map_err(|e| fs_error::write_error(temp_root, e))?;
    let archive_path = temp_root.join(format!("{}.zip", content_hash.hex()));
    fs::write(&archive_path, &bytes).map_err(|e| fs_error::write_error(&archive_path, e))?;

    zone::mark_downloaded(&archive_path, &url)?;

    info!(url = %url, hash = %content_hash, bytes = bytes.len(), "downloaded archive");

    Ok(FetchResult {
        archive_path,
        content_hash,
    })
}

/// Extract a fetched archive into its hash-named directory
pub fn extract_snapshot(fetched: &FetchResult, temp_root: &Path) -> Result<ExtractedTree> {
    let root = extraction_dir(temp_root, &fetched.content_hash);
    extract::extract(&fetched.archive_path, &root)?;
    let content_root = extract::content_root(&root)?;

    Ok(ExtractedTree { root, content_root })
}
