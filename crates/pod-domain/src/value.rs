use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, Utc};

/// A typed cell value as it flows through builders, the translator, and
/// result rows.
///
/// Mirrors the six column types plus `Null`; engine bindings are converted
/// into this representation by the result normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric coercion used by the aggregate reducer and comparison
    /// operators. Non-numeric values yield `None` and are skipped.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
            Value::DateTime(dt) => Some(dt.timestamp_millis() as f64),
            Value::Json(serde_json::Value::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    /// Textual form used when the value names a row id.
    pub fn as_id_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            Value::Json(v) => v.to_string(),
            Value::Null => String::new(),
        }
    }

    /// Stable serialization used as a hash/grouping key.
    ///
    /// Distinct values map to distinct keys and equal values to equal keys;
    /// JSON objects serialize with sorted keys so the result is
    /// deterministic.
    pub fn group_key(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::String(s) => serde_json::Value::String(s.clone()).to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => {
                // Keep 3 and 3.0 under one key, like loose numeric equality
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::Boolean(b) => b.to_string(),
            Value::DateTime(dt) => format!("dt:{}", dt.timestamp_millis()),
            Value::Json(v) => format!("json:{v}"),
        }
    }

    /// Loose equality: integers and floats compare numerically, everything
    /// else by structural equality.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                self.as_number() == other.as_number()
            }
            (a, b) => a == b,
        }
    }

    /// Ordering used by comparison filters and ORDER BY.
    ///
    /// `None` means the pair is not comparable; filters treat that as
    /// not-matching and sorting falls back to the grouping key.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            _ => {
                let (a, b) = (self.as_number()?, other.as_number()?);
                a.partial_cmp(&b)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
