use std::collections::BTreeMap;

use crate::{Value, condition::ColumnRef};

/// A result row: column names (plain and `alias.column` qualified) mapped
/// to typed values. The reserved key `subject` holds the resource IRI and
/// `id` its derived identifier.
pub type Row = BTreeMap<String, Value>;

/// Reserved row key holding the subject IRI.
pub const SUBJECT_KEY: &str = "subject";

/// Reserved row key holding the derived id.
pub const ID_KEY: &str = "id";

/// Derive the row id from a subject IRI: the substring after the last `/`
/// or `#`.
pub fn id_from_subject(subject: &str) -> &str {
    subject
        .rfind(['/', '#'])
        .map(|idx| &subject[idx + 1..])
        .unwrap_or(subject)
}

/// Resolve a column reference against a row: qualified key first, then the
/// plain name.
pub fn lookup<'a>(row: &'a Row, column: &ColumnRef) -> Option<&'a Value> {
    if let Some(q) = &column.qualifier {
        if let Some(v) = row.get(&format!("{q}.{}", column.name)) {
            return Some(v);
        }
    }
    row.get(&column.name)
}

/// Resolve an output alias the way the result normalizer does: exact alias
/// match, then `alias.column` qualified key, then the plain column name.
pub fn lookup_projection<'a>(row: &'a Row, alias: &str, field: &ColumnRef) -> Option<&'a Value> {
    if let Some(v) = row.get(alias) {
        return Some(v);
    }
    lookup(row, field)
}

/// Stable serialization of a whole row, used for DISTINCT.
pub fn row_key(row: &Row) -> String {
    let mut key = String::new();
    for (name, value) in row {
        key.push_str(name);
        key.push('=');
        key.push_str(&value.group_key());
        key.push(';');
    }
    key
}
