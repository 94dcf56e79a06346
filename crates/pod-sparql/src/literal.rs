use chrono::SecondsFormat;
use pod_domain::{Column, ColumnType, Value};

use crate::error::{Result, TranslateError};

pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
pub const XSD_JSON: &str = "http://www.w3.org/2001/XMLSchema#json";

/// Escape a string for embedding in a double-quoted Turtle/SPARQL literal.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Format a value as the object term of a triple, dispatching on the
/// column's semantic type.
///
/// Datatype IRIs are written in full so the statement never leans on a
/// prefix the registry might not declare.
pub fn format_term(column: &Column, value: &Value) -> Result<String> {
    // Reference columns turn numeric values into IRIs under the target
    if let Some(target) = column.reference_target() {
        if let Value::Integer(n) = value {
            return Ok(format!("<{}/{n}>", target.trim_end_matches('/')));
        }
    }

    match (column.column_type(), value) {
        (_, Value::Null) => Err(TranslateError::UnsupportedValue {
            column: column.name().to_string(),
            reason: "null has no literal form".to_string(),
        }),
        (ColumnType::String, v) => Ok(quoted(v)),
        (ColumnType::Integer, Value::Integer(n)) => Ok(n.to_string()),
        (ColumnType::Integer, Value::Float(f)) => Ok(f.to_string()),
        (ColumnType::Boolean, Value::Boolean(b)) => {
            Ok(format!("\"{b}\"^^<{XSD_BOOLEAN}>"))
        }
        (ColumnType::DateTime, Value::DateTime(dt)) => Ok(format!(
            "\"{}\"^^<{XSD_DATETIME}>",
            dt.to_rfc3339_opts(SecondsFormat::Millis, true)
        )),
        (ColumnType::DateTime, Value::String(s)) => {
            Ok(format!("\"{}\"^^<{XSD_DATETIME}>", escape_string(s)))
        }
        (ColumnType::Json | ColumnType::Object, Value::Json(v)) => {
            Ok(format!("\"{}\"^^<{XSD_JSON}>", escape_string(&v.to_string())))
        }
        (ColumnType::Json | ColumnType::Object, Value::String(s)) => {
            Ok(format!("\"{}\"^^<{XSD_JSON}>", escape_string(s)))
        }
        // Mismatched value kinds degrade to their natural form
        (_, Value::Integer(n)) => Ok(n.to_string()),
        (_, Value::Float(f)) => Ok(f.to_string()),
        (_, Value::Boolean(b)) => Ok(format!("\"{b}\"^^<{XSD_BOOLEAN}>")),
        (_, Value::DateTime(dt)) => Ok(format!(
            "\"{}\"^^<{XSD_DATETIME}>",
            dt.to_rfc3339_opts(SecondsFormat::Millis, true)
        )),
        (_, v) => Ok(quoted(v)),
    }
}

/// Format a value for use inside a FILTER expression where no column type
/// is known.
pub fn format_untyped(value: &Value) -> String {
    match value {
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => format!("\"{b}\"^^<{XSD_BOOLEAN}>"),
        Value::DateTime(dt) => format!(
            "\"{}\"^^<{XSD_DATETIME}>",
            dt.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        other => quoted(other),
    }
}

fn quoted(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", escape_string(s)),
        Value::Json(v) => format!("\"{}\"", escape_string(&v.to_string())),
        other => format!("\"{}\"", escape_string(&other.as_id_string())),
    }
}
