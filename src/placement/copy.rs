//! Best-effort recursive copy

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{ModfetchError, Result, fs as fs_error, placement};

/// Outcome of a tree copy
#[derive(Debug, Default)]
pub struct CopyReport {
    pub copied: usize,
    /// One entry per path that could not be copied
    pub failures: Vec<ModfetchError>,
}

/// Copy `src` into `dst`, overwriting existing files.
///
/// Only an unreadable `src` fails the call. Anything that goes wrong below it
/// is recorded in the report and the copy carries on; nothing already copied
/// is rolled back.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<CopyReport> {
    let mut report = CopyReport::default();
    fs::create_dir_all(dst).map_err(|e| fs_error::write_error(dst, e))?;
    let entries = fs::read_dir(src).map_err(|e| fs_error::read_error(src, e))?;
    copy_entries(entries, dst, &mut report);
    Ok(report)
}

fn copy_entries(entries: fs::ReadDir, dst: &Path, report: &mut CopyReport) {
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                record(report, dst, e.to_string());
                continue;
            }
        };
        let entry_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if entry_path.is_dir() {
            if let Err(e) = fs::create_dir_all(&dst_path) {
                record(report, &dst_path, e.to_string());
                continue;
            }
            match fs::read_dir(&entry_path) {
                Ok(children) => copy_entries(children, &dst_path, report),
                Err(e) => record(report, &entry_path, e.to_string()),
            }
        } else {
            match fs::copy(&entry_path, &dst_path) {
                Ok(_) => report.copied += 1,
                Err(e) => record(report, &dst_path, e.to_string()),
            }
        }
    }
}

fn record(report: &mut CopyReport, path: &Path, reason: String) {
    let err = placement::copy_failed(path.display().to_string(), reason);
    warn!("{err}");
    report.failures.push(err);
}
