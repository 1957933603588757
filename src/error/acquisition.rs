//! Download and extraction errors

use super::ModfetchError;

/// Creates a download failure carrying the last response seen
pub fn download_failed(
    url: impl Into<String>,
    last_response: impl Into<String>,
    attempts: u32,
) -> ModfetchError {
    ModfetchError::Acquisition {
        url: url.into(),
        last_response: last_response.into(),
        attempts,
    }
}

/// Creates an extraction error
pub fn extraction_failed(path: impl Into<String>, reason: impl Into<String>) -> ModfetchError {
    ModfetchError::Extraction {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an HTTP client setup error
pub fn client_failed(reason: impl Into<String>) -> ModfetchError {
    ModfetchError::HttpClient {
        reason: reason.into(),
    }
}
