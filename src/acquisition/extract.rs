//! Zip extraction for downloaded snapshots

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::error::{Result, acquisition, fs as fs_error};

/// Extract `archive` into `dest`.
///
/// Re-running against an existing `dest` overwrites files in place. Entries
/// whose names would land outside `dest` are rejected.
pub fn extract(archive: &Path, dest: &Path) -> Result<usize> {
    let fail = |reason: String| acquisition::extraction_failed(archive.display().to_string(), reason);

    let file = File::open(archive).map_err(|e| fs_error::read_error(archive, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| fail(e.to_string()))?;

    fs::create_dir_all(dest).map_err(|e| fs_error::write_error(dest, e))?;

    let mut written = 0;
    for idx in 0..zip.len() {
        let mut entry = zip
            .by_index(idx)
            .map_err(|e| fail(format!("entry #{idx}: {e}")))?;

        let relative = entry
            .enclosed_name()
            .ok_or_else(|| fail(format!("entry '{}' escapes the target directory", entry.name())))?;
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| fs_error::write_error(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| fs_error::write_error(parent, e))?;
        }

        let mut out = File::create(&out_path).map_err(|e| fs_error::write_error(&out_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| fs_error::write_error(&out_path, e))?;
        written += 1;
    }

    debug!(archive = %archive.display(), dest = %dest.display(), files = written, "extracted archive");
    Ok(written)
}

/// GitHub wraps snapshot contents in one `owner-repo-sha/` folder.
/// Returns that folder when it is the only entry, else `dir` itself.
pub fn content_root(dir: &Path) -> Result<PathBuf> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| fs_error::read_error(dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path());

    match (entries.next(), entries.next()) {
        (Some(only), None) if only.is_dir() => Ok(only),
        _ => Ok(dir.to_path_buf()),
    }
}
