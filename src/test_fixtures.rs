//! Test fixtures and utilities for reducing test setup duplication.
//!
//! This module provides helper functions to create common test environments
//! (temp directories, snapshot archives, a scripted HTTP transport) with a
//! single function call.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{create_temp_dir, zip_bytes, MockTransport};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     let body = zip_bytes(&[("acme-widget-1/widget.psd1", "@{ ModuleVersion = '1.0' }")]);
//!     let transport = MockTransport::new(vec![Ok(body)]);
//! }
//! ```

#![allow(clippy::expect_used)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{Cursor, Write};
use std::path::Path;

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::acquisition::Transport;
use crate::acquisition::transport::TransportError;

/// Create a temp directory in the system temp location.
///
/// Uses `crate::temp::temp_dir_base()` to ensure temp dirs are never
/// created under the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::temp_dir_base()).expect("Failed to create temp directory")
}

/// Create test files in a directory.
///
/// Takes a list of (path, content) tuples and creates those files.
/// Paths are relative to the provided base directory.
///
/// # Panics
///
/// Panics if any file cannot be created.
pub fn create_test_files(base: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = base.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full_path, content).expect("Failed to write test file");
    }
}

/// Build an in-memory zip archive from (path, content) pairs.
///
/// # Panics
///
/// Panics if the archive cannot be written.
#[must_use]
pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, content) in files {
        writer
            .start_file(*path, SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer
            .write_all(content.as_bytes())
            .expect("Failed to write zip entry");
    }
    writer
        .finish()
        .expect("Failed to finish zip archive")
        .into_inner()
}

/// Write a zip archive from (path, content) pairs to `path`.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_zip(path: &Path, files: &[(&str, &str)]) {
    std::fs::write(path, zip_bytes(files)).expect("Failed to write zip archive");
}

/// Transport that replays scripted responses in order and records requests
pub struct MockTransport {
    responses: RefCell<VecDeque<Result<Vec<u8>, TransportError>>>,
    requests: RefCell<Vec<(String, Option<String>)>>,
}

impl MockTransport {
    pub fn new(responses: Vec<Result<Vec<u8>, TransportError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// URLs requested so far, in order
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(u, _)| u.clone()).collect()
    }

    /// Tokens sent with each request, in order
    pub fn requested_tokens(&self) -> Vec<Option<String>> {
        self.requests.borrow().iter().map(|(_, t)| t.clone()).collect()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, token: Option<&str>) -> Result<Vec<u8>, TransportError> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), token.map(str::to_string)));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_temp_dir() {
        let temp = create_temp_dir();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_create_test_files() {
        let temp = create_temp_dir();
        create_test_files(temp.path(), &[("a/b.txt", "x")]);
        assert!(temp.path().join("a/b.txt").is_file());
    }

    #[test]
    fn test_mock_transport_exhausted() {
        let transport = MockTransport::new(vec![]);
        assert!(transport.get("https://example.invalid", None).is_err());
        assert_eq!(transport.requested_urls().len(), 1);
    }
}
