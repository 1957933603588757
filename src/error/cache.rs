//! Cache errors

use super::ModfetchError;

/// Creates a cache operation failed error
pub fn operation_failed(message: impl Into<String>) -> ModfetchError {
    ModfetchError::CacheOperationFailed {
        message: message.into(),
    }
}
