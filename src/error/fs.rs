//! File system errors

use std::path::Path;

use super::ModfetchError;

/// Creates a file read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> ModfetchError {
    ModfetchError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> ModfetchError {
    ModfetchError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Maps an IO error on `path` into a read failure
pub fn read_error(path: &Path, e: std::io::Error) -> ModfetchError {
    read_failed(path.display().to_string(), e.to_string())
}

/// Maps an IO error on `path` into a write failure
pub fn write_error(path: &Path, e: std::io::Error) -> ModfetchError {
    write_failed(path.display().to_string(), e.to_string())
}
