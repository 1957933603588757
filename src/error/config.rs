//! Configuration errors

use super::ModfetchError;

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> ModfetchError {
    ModfetchError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> ModfetchError {
    ModfetchError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
