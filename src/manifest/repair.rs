//! Rebuild a manifest that failed validation
//!
//! Every entry the tolerant parser recovers under a known key is carried
//! over with canonical casing. Unknown keys are dropped. `ModuleVersion` is
//! always rewritten with the determined version and a missing `GUID` stays
//! missing. Entries that cannot be reconciled abort the repair.

use tracing::warn;

use super::parser::parse_tolerant;
use super::schema;
use super::value::Value;
use super::version::ModuleVersion;

#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    /// Fields in declaration order, canonical keys
    pub fields: Vec<(String, Value)>,
    pub version: ModuleVersion,
    /// Unknown keys that were not carried over
    pub dropped: Vec<String>,
}

/// Rebuild the fields of a broken manifest.
///
/// Version precedence: the manifest's own well-formed `ModuleVersion`, then
/// `assert_version`, then the default version.
pub fn repair(src: &str, assert_version: Option<&ModuleVersion>) -> Result<Repaired, String> {
    let parsed = parse_tolerant(src).map_err(|e| format!("nothing recoverable ({e})"))?;
    for err in &parsed.errors {
        warn!(line = err.line, reason = %err.message, "skipped unparsable manifest entry");
    }

    let mut fields: Vec<(String, Value)> = Vec::new();
    let mut dropped = Vec::new();
    let mut declared = None;

    for entry in parsed.entries {
        let Some((canonical, kind)) = schema::lookup(&entry.key) else {
            warn!(key = %entry.key, line = entry.line, "dropping unknown manifest key");
            dropped.push(entry.key);
            continue;
        };

        if let Some((_, existing)) = fields.iter().find(|(k, _)| k == canonical) {
            if *existing == entry.value {
                continue;
            }
            return Err(format!(
                "line {}: duplicate key '{canonical}' with conflicting values",
                entry.line
            ));
        }

        if canonical == "ModuleVersion" {
            declared = entry.value.as_text().and_then(|t| t.parse::<ModuleVersion>().ok());
        } else {
            schema::check_shape(canonical, kind, &entry.value)
                .map_err(|reason| format!("line {}: {reason}", entry.line))?;
        }

        fields.push((canonical.to_string(), entry.value));
    }

    reconcile_root_module(&mut fields)?;

    let version = declared
        .or_else(|| assert_version.cloned())
        .unwrap_or_else(ModuleVersion::default_version);
    set_version(&mut fields, &version);

    Ok(Repaired {
        fields,
        version,
        dropped,
    })
}

/// `ModuleToProcess` is the legacy name of `RootModule`
fn reconcile_root_module(fields: &mut Vec<(String, Value)>) -> Result<(), String> {
    let root = fields.iter().position(|(k, _)| k == "RootModule");
    let legacy = fields.iter().position(|(k, _)| k == "ModuleToProcess");

    if let (Some(root), Some(legacy)) = (root, legacy) {
        if fields[root].1 != fields[legacy].1 {
            return Err("RootModule and ModuleToProcess name different modules".to_string());
        }
        fields.remove(legacy);
    }
    Ok(())
}

fn set_version(fields: &mut Vec<(String, Value)>, version: &ModuleVersion) {
    let value = Value::String(version.to_string());

    if let Some((_, existing)) = fields.iter_mut().find(|(k, _)| k == "ModuleVersion") {
        *existing = value;
        return;
    }

    let at = fields
        .iter()
        .position(|(k, _)| k == "RootModule" || k == "ModuleToProcess")
        .map_or(0, |i| i + 1);
    fields.insert(at, ("ModuleVersion".to_string(), value));
}
