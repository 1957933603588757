//! Cache statistics and management
//!
//! This module provides functions for listing, removing, and
//! getting statistics about cached snapshots.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, cache};
use crate::hash::HASH_PREFIX;

const ARCHIVE_EXTENSION: &str = ".zip";

/// One cached snapshot, by content hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSnapshot {
    /// BLAKE3 hex digest
    pub hash: String,
    /// Extraction directory is present
    pub extracted: bool,
    /// A leftover archive is present
    pub archive: bool,
    /// Total size in bytes
    pub size: u64,
}

impl CachedSnapshot {
    /// Format size as human-readable string
    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }
}

/// Cache statistics
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of distinct snapshots
    pub snapshots: usize,
    /// Leftover archives from failed installs
    pub archives: usize,
    /// Total size in bytes
    pub total_size: u64,
}

impl CacheStats {
    /// Format total size as human-readable string
    pub fn formatted_size(&self) -> String {
        format_size(self.total_size)
    }
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < 1024.0 {
        format!("{bytes} B")
    } else if size < 1024.0 * 1024.0 {
        format!("{:.1} KB", size / 1024.0)
    } else if size < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
    }
}

fn is_hash(name: &str) -> bool {
    name.len() == 64 && name.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Hash-named entries under `root`: (hash, path, is_dir)
fn cache_entries(root: &Path) -> Result<Vec<(String, PathBuf, bool)>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(root)
        .map_err(|e| cache::operation_failed(format!("Failed to read cache directory: {e}")))?
    {
        let entry =
            entry.map_err(|e| cache::operation_failed(format!("Failed to read entry: {e}")))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if path.is_dir() && is_hash(&name) {
            entries.push((name, path, true));
        } else if let Some(stem) = name.strip_suffix(ARCHIVE_EXTENSION) {
            if path.is_file() && is_hash(stem) {
                entries.push((stem.to_string(), path, false));
            }
        }
    }
    Ok(entries)
}

/// List cached snapshots, ordered by hash
pub fn list_snapshots(root: &Path) -> Result<Vec<CachedSnapshot>> {
    let mut by_hash: BTreeMap<String, CachedSnapshot> = BTreeMap::new();

    for (hash, path, is_dir) in cache_entries(root)? {
        let size = if is_dir {
            dir_size(&path)?
        } else {
            fs::metadata(&path).map(|m| m.len()).unwrap_or(0)
        };
        let snapshot = by_hash
            .entry(hash.clone())
            .or_insert_with(|| CachedSnapshot {
                hash,
                extracted: false,
                archive: false,
                size: 0,
            });
        if is_dir {
            snapshot.extracted = true;
        } else {
            snapshot.archive = true;
        }
        snapshot.size += size;
    }

    Ok(by_hash.into_values().collect())
}

/// Get cache statistics
pub fn cache_stats(root: &Path) -> Result<CacheStats> {
    let snapshots = list_snapshots(root)?;
    Ok(CacheStats {
        snapshots: snapshots.len(),
        archives: snapshots.iter().filter(|s| s.archive).count(),
        total_size: snapshots.iter().map(|s| s.size).sum(),
    })
}

/// Remove snapshots whose hash starts with `prefix` (`blake3:` optional).
/// Returns how many snapshots were removed.
pub fn remove_snapshots(root: &Path, prefix: &str) -> Result<usize> {
    let prefix = prefix.strip_prefix(HASH_PREFIX).unwrap_or(prefix).to_ascii_lowercase();
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(cache::operation_failed(format!(
            "Invalid snapshot hash prefix: '{prefix}'"
        )));
    }

    let removed = remove_matching(root, |hash| hash.starts_with(&prefix))?;
    if removed == 0 {
        return Err(cache::operation_failed(format!(
            "Snapshot not found in cache: {prefix}"
        )));
    }
    Ok(removed)
}

/// Remove every cached snapshot. Returns how many were removed.
pub fn clear_cache(root: &Path) -> Result<usize> {
    remove_matching(root, |_| true)
}

fn remove_matching(root: &Path, matches: impl Fn(&str) -> bool) -> Result<usize> {
    let mut removed = std::collections::BTreeSet::new();

    for (hash, path, is_dir) in cache_entries(root)? {
        if !matches(&hash.to_ascii_lowercase()) {
            continue;
        }
        let result = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|e| {
            cache::operation_failed(format!("Failed to remove {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "removed cache entry");
        removed.insert(hash);
    }

    Ok(removed.len())
}

/// Calculate directory size recursively
fn dir_size(path: &Path) -> Result<u64> {
    let mut size = 0u64;
    for entry in WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            size += entry
                .metadata()
                .map_err(|e| cache::operation_failed(format!("Failed to get metadata: {e}")))?
                .len();
        }
    }
    Ok(size)
}
