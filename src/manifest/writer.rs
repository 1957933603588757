//! Render manifest fields as a canonical `.psd1`

use std::fmt::Write;

use super::value::Value;

const INDENT: &str = "    ";

/// Render `fields` as a manifest hashtable preceded by a comment header
pub fn render(module_name: &str, fields: &[(String, Value)]) -> String {
    let mut out = String::new();
    out.push_str("#\n");
    let _ = writeln!(out, "# Module manifest for module '{module_name}'");
    out.push_str("#\n# Rebuilt by modfetch from a manifest that failed validation\n#\n\n");
    out.push_str("@{\n");
    for (key, value) in fields {
        out.push('\n');
        out.push_str(INDENT);
        let _ = write!(out, "{key} = ");
        write_value(&mut out, value, 1);
        out.push('\n');
    }
    out.push_str("\n}\n");
    out
}

/// Single-quoted string literal
pub fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::String(s) => out.push_str(&quote(s)),
        Value::Number(n) | Value::Bare(n) => out.push_str(n),
        Value::Bool(true) => out.push_str("$true"),
        Value::Bool(false) => out.push_str("$false"),
        Value::Null => out.push_str("$null"),
        Value::Array(items) if items.iter().any(|v| matches!(v, Value::Table(_))) => {
            out.push_str("@(\n");
            for item in items {
                out.push_str(&INDENT.repeat(depth + 1));
                write_value(out, item, depth + 1);
                out.push('\n');
            }
            out.push_str(&INDENT.repeat(depth));
            out.push(')');
        }
        Value::Array(items) => {
            out.push_str("@(");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, depth);
            }
            out.push(')');
        }
        Value::Table(entries) if entries.is_empty() => out.push_str("@{}"),
        Value::Table(entries) => {
            out.push_str("@{\n");
            for (key, v) in entries {
                out.push_str(&INDENT.repeat(depth + 1));
                out.push_str(&render_key(key));
                out.push_str(" = ");
                write_value(out, v, depth + 1);
                out.push('\n');
            }
            out.push_str(&INDENT.repeat(depth));
            out.push('}');
        }
    }
}

/// Keys that are not plain identifiers are quoted
fn render_key(key: &str) -> String {
    if !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_') {
        key.to_string()
    } else {
        quote(key)
    }
}
