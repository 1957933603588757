//! Module manifest resolution
//!
//! Locates the `.psd1` in an extracted snapshot and validates it strictly. A
//! manifest that passes is adopted untouched. One that fails is rebuilt from
//! whatever can be recovered and written back over the original file.

pub mod parser;
pub mod repair;
pub mod schema;
pub mod value;
pub mod version;
pub mod writer;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{ModfetchError, Result, fs as fs_error, manifest};

pub use value::Value;
pub use version::ModuleVersion;

/// Manifest file extension (matched case-insensitively)
pub const MANIFEST_EXTENSION: &str = "psd1";

/// A manifest ready for placement
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub path: PathBuf,
    pub version: ModuleVersion,
    /// Top-level fields in declaration order
    pub fields: Vec<(String, Value)>,
    /// Whether the file was rebuilt
    pub repaired: bool,
}

/// Metadata shown after install
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestSummary {
    pub module: String,
    pub version: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub functions: Vec<String>,
    pub repaired: bool,
}

impl Manifest {
    /// Field value by key, case-insensitive
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_text).map(str::to_string)
    }

    /// Directory holding the manifest
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }

    pub fn summary(&self, module: &str, installed_at: &Path) -> ManifestSummary {
        let functions = self
            .get("FunctionsToExport")
            .and_then(Value::as_text_list)
            .map(|list| list.into_iter().map(str::to_string).collect())
            .unwrap_or_default();

        ManifestSummary {
            module: module.to_string(),
            version: self.version.to_string(),
            path: installed_at.to_path_buf(),
            root_module: self.text("RootModule").or_else(|| self.text("ModuleToProcess")),
            author: self.text("Author"),
            description: self.text("Description"),
            functions,
            repaired: self.repaired,
        }
    }
}

/// Keys only a module manifest carries; data files such as analyzer
/// settings or build scripts have none of them
const IDENTITY_KEYS: &[&str] = &[
    "RootModule",
    "ModuleToProcess",
    "ModuleVersion",
    "GUID",
    "FunctionsToExport",
    "CmdletsToExport",
    "VariablesToExport",
    "AliasesToExport",
    "DscResourcesToExport",
];

/// Whether `path` parses to a hashtable with at least one identity key
fn looks_like_module_manifest(path: &Path) -> bool {
    let Ok(bytes) = fs::read(path) else {
        return false;
    };
    parser::parse_tolerant(&decode_text(&bytes)).is_ok_and(|parsed| {
        parsed
            .entries
            .iter()
            .any(|e| IDENTITY_KEYS.iter().any(|k| k.eq_ignore_ascii_case(&e.key)))
    })
}

/// Find the manifest under `root`.
///
/// Candidates are ordered by depth, then path. Files that look like module
/// manifests beat plain data files; within each group a file named after the
/// module beats the shallowest one.
pub fn find_manifest(root: &Path, module_name: &str) -> Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_manifest = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(MANIFEST_EXTENSION));
        if is_manifest {
            candidates.push((entry.depth(), entry.into_path()));
        }
    }
    candidates.sort();

    let is_named = |path: &Path| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.eq_ignore_ascii_case(module_name))
    };

    let (manifests, data_files): (Vec<PathBuf>, Vec<PathBuf>) = candidates
        .into_iter()
        .map(|(_, path)| path)
        .partition(|path| looks_like_module_manifest(path));

    for group in [&manifests, &data_files] {
        if let Some(path) = group.iter().find(|p| is_named(p)).or_else(|| group.first()) {
            debug!(
                path = %path.display(),
                manifests = manifests.len(),
                data_files = data_files.len(),
                "selected manifest"
            );
            return Ok(Some(path.clone()));
        }
    }
    Ok(None)
}

/// Locate, validate and if necessary repair the manifest under `root`
pub fn resolve_manifest(
    root: &Path,
    module_name: &str,
    assert_version: Option<&ModuleVersion>,
) -> Result<Manifest> {
    let path = find_manifest(root, module_name)?.ok_or_else(|| ModfetchError::NoManifest {
        root: root.display().to_string(),
    })?;
    debug!(path = %path.display(), "found module manifest");

    let bytes = fs::read(&path).map_err(|e| fs_error::read_error(&path, e))?;
    let src = decode_text(&bytes);

    match validate_text(&src) {
        Ok((fields, version)) => {
            debug!(version = %version, "manifest is valid");
            Ok(Manifest {
                path,
                version,
                fields,
                repaired: false,
            })
        }
        Err(reason) => {
            let err = manifest::validation_failed(path.display().to_string(), reason);
            warn!("{err}; rebuilding manifest");
            repair_in_place(path, &src, module_name, assert_version)
        }
    }
}

fn validate_text(src: &str) -> std::result::Result<(Vec<(String, Value)>, ModuleVersion), String> {
    let entries = parser::parse_strict(src).map_err(|e| e.to_string())?;
    let version = schema::validate(&entries)?;
    let fields = entries.into_iter().map(|e| (e.key, e.value)).collect();
    Ok((fields, version))
}

fn repair_in_place(
    path: PathBuf,
    src: &str,
    module_name: &str,
    assert_version: Option<&ModuleVersion>,
) -> Result<Manifest> {
    let fail = |reason: String| manifest::repair_failed(path.display().to_string(), reason);

    let repaired = repair::repair(src, assert_version).map_err(fail)?;
    let text = writer::render(module_name, &repaired.fields);

    // The rebuilt text must itself pass validation
    let (fields, version) = validate_text(&text).map_err(fail)?;

    fs::write(&path, text).map_err(|e| fs_error::write_error(&path, e))?;
    info!(
        path = %path.display(),
        version = %version,
        dropped = repaired.dropped.len(),
        "rewrote repaired manifest"
    );

    Ok(Manifest {
        path,
        version,
        fields,
        repaired: true,
    })
}

/// Decode manifest bytes; Windows PowerShell writes UTF-16 with a BOM
fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => {
            decode_utf16(rest.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])))
        }
        [0xFE, 0xFF, rest @ ..] => {
            decode_utf16(rest.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])))
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(units: impl Iterator<Item = u16>) -> String {
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
