//! Manifest errors

use super::ModfetchError;

/// Creates a validation error (recovered locally by repair mode)
pub fn validation_failed(path: impl Into<String>, reason: impl Into<String>) -> ModfetchError {
    ModfetchError::ManifestValidation {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a repair error
pub fn repair_failed(path: impl Into<String>, reason: impl Into<String>) -> ModfetchError {
    ModfetchError::ManifestRepair {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid version error
pub fn invalid_version(input: impl Into<String>) -> ModfetchError {
    ModfetchError::InvalidVersion {
        input: input.into(),
    }
}
