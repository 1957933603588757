//! Values of the PowerShell data language subset used by module manifests

/// A manifest value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Quoted string (quotes and escapes already resolved)
    String(String),
    /// Numeric literal, kept as written
    Number(String),
    Bool(bool),
    Null,
    /// `@( ... )` or a bare comma list
    Array(Vec<Value>),
    /// `@{ ... }`, entries in declaration order
    Table(Vec<(String, Value)>),
    /// Unquoted word or variable reference, kept as written
    Bare(String),
}

impl Value {
    /// Text of scalar values
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Number(s) | Value::Bare(s) => Some(s),
            _ => None,
        }
    }

    /// Flatten a scalar or array of scalars into strings
    pub fn as_text_list(&self) -> Option<Vec<&str>> {
        match self {
            Value::Array(items) => items.iter().map(Value::as_text).collect(),
            other => other.as_text().map(|s| vec![s]),
        }
    }

    /// Short type name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
            Value::Array(_) => "array",
            Value::Table(_) => "hashtable",
            Value::Bare(_) => "bare word",
        }
    }
}
