//! Source resolution errors

use super::ModfetchError;

/// Creates an invalid source error
pub fn invalid(input: impl Into<String>, reason: impl Into<String>) -> ModfetchError {
    ModfetchError::InvalidSource {
        input: input.into(),
        reason: reason.into(),
    }
}
