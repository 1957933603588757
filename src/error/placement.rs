//! Placement errors

use super::ModfetchError;

/// Creates a copy failure for a single destination path
pub fn copy_failed(path: impl Into<String>, reason: impl Into<String>) -> ModfetchError {
    ModfetchError::Placement {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an error for a well-known directory that could not be located
pub fn unknown_directory(what: impl Into<String>) -> ModfetchError {
    ModfetchError::UnknownDirectory { what: what.into() }
}
