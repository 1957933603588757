//! Module manifest schema
//!
//! The set of keys `New-ModuleManifest` understands, their canonical casing
//! and the value shape each one accepts.

use std::collections::HashSet;

use super::parser::Entry;
use super::value::Value;
use super::version::ModuleVersion;

/// Value shape accepted by a manifest key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single scalar
    Text,
    /// A scalar that parses as a version
    Version,
    /// A GUID string
    Guid,
    /// A scalar or an array of scalars
    List,
    /// Module specifications: names or `@{ ModuleName = ... }` tables
    ModuleSpecs,
    /// A hashtable
    Table,
}

/// Known keys, canonical casing
pub const KNOWN_KEYS: &[(&str, FieldKind)] = &[
    ("RootModule", FieldKind::Text),
    ("ModuleToProcess", FieldKind::Text),
    ("ModuleVersion", FieldKind::Version),
    ("CompatiblePSEditions", FieldKind::List),
    ("GUID", FieldKind::Guid),
    ("Author", FieldKind::Text),
    ("CompanyName", FieldKind::Text),
    ("Copyright", FieldKind::Text),
    ("Description", FieldKind::Text),
    ("PowerShellVersion", FieldKind::Version),
    ("PowerShellHostName", FieldKind::Text),
    ("PowerShellHostVersion", FieldKind::Version),
    ("DotNetFrameworkVersion", FieldKind::Version),
    ("CLRVersion", FieldKind::Version),
    ("ProcessorArchitecture", FieldKind::Text),
    ("RequiredModules", FieldKind::ModuleSpecs),
    ("RequiredAssemblies", FieldKind::List),
    ("ScriptsToProcess", FieldKind::List),
    ("TypesToProcess", FieldKind::List),
    ("FormatsToProcess", FieldKind::List),
    ("NestedModules", FieldKind::ModuleSpecs),
    ("FunctionsToExport", FieldKind::List),
    ("CmdletsToExport", FieldKind::List),
    ("VariablesToExport", FieldKind::List),
    ("AliasesToExport", FieldKind::List),
    ("DscResourcesToExport", FieldKind::List),
    ("ModuleList", FieldKind::ModuleSpecs),
    ("FileList", FieldKind::List),
    ("PrivateData", FieldKind::Table),
    ("HelpInfoURI", FieldKind::Text),
    ("DefaultCommandPrefix", FieldKind::Text),
];

/// Canonical spelling and kind of a key, matched case-insensitively
pub fn lookup(key: &str) -> Option<(&'static str, FieldKind)> {
    KNOWN_KEYS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .copied()
}

/// Check that `value` has the shape `kind` requires
pub fn check_shape(key: &str, kind: FieldKind, value: &Value) -> Result<(), String> {
    let wrong = || format!("{key} cannot be a {}", value.kind());

    match kind {
        FieldKind::Text => match value {
            Value::Null => Ok(()),
            other => other.as_text().map(|_| ()).ok_or_else(wrong),
        },
        FieldKind::Version => {
            let text = value.as_text().ok_or_else(wrong)?;
            text.parse::<ModuleVersion>()
                .map(|_| ())
                .map_err(|_| format!("{key} '{text}' is not a valid version"))
        }
        FieldKind::Guid => {
            let text = value.as_text().ok_or_else(wrong)?;
            if is_guid(text) {
                Ok(())
            } else {
                Err(format!("{key} '{text}' is not a valid GUID"))
            }
        }
        FieldKind::List => match value {
            Value::Null => Ok(()),
            other => other.as_text_list().map(|_| ()).ok_or_else(wrong),
        },
        FieldKind::ModuleSpecs => {
            let spec_ok = |v: &Value| matches!(v, Value::Table(_)) || v.as_text().is_some();
            match value {
                Value::Null => Ok(()),
                Value::Array(items) if items.iter().all(spec_ok) => Ok(()),
                other if spec_ok(other) => Ok(()),
                _ => Err(wrong()),
            }
        }
        FieldKind::Table => match value {
            Value::Table(_) => Ok(()),
            _ => Err(wrong()),
        },
    }
}

/// `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`, optionally braced
pub fn is_guid(text: &str) -> bool {
    let inner = text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(text);
    let groups: Vec<&str> = inner.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len && g.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Strictly validate parsed entries, returning the declared version
pub fn validate(entries: &[Entry]) -> Result<ModuleVersion, String> {
    let mut seen = HashSet::new();
    let mut version = None;

    for entry in entries {
        let (canonical, kind) = lookup(&entry.key)
            .ok_or_else(|| format!("line {}: unknown key '{}'", entry.line, entry.key))?;

        if !seen.insert(canonical) {
            return Err(format!("line {}: duplicate key '{}'", entry.line, entry.key));
        }

        check_shape(canonical, kind, &entry.value)
            .map_err(|reason| format!("line {}: {reason}", entry.line))?;

        if canonical == "ModuleVersion" {
            version = entry.value.as_text().and_then(|t| t.parse().ok());
        }
    }

    version.ok_or_else(|| "ModuleVersion is missing".to_string())
}
