use chrono::{DateTime, Utc};
use pod_domain::{
    Row, SelectField, Value,
    row::{self, ID_KEY, SUBJECT_KEY},
};

use crate::engine::{BindingSet, Term, TermKind};

const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Type a bound term by its RDF datatype.
///
/// A literal that does not parse as its declared datatype is logged and
/// surfaced as its raw string form.
pub(crate) fn value_from_term(term: &Term) -> Value {
    let TermKind::Literal { datatype, .. } = &term.kind else {
        return Value::String(term.value.clone());
    };
    let Some(datatype) = datatype else {
        return Value::String(term.value.clone());
    };
    let local = datatype.strip_prefix(XSD).unwrap_or(datatype.as_str());

    let parsed = match local {
        "integer" | "int" | "long" | "short" | "byte" | "nonNegativeInteger"
        | "positiveInteger" | "negativeInteger" | "nonPositiveInteger" | "unsignedLong"
        | "unsignedInt" | "unsignedShort" | "unsignedByte" => {
            term.value.parse::<i64>().ok().map(Value::Integer)
        }
        "decimal" | "double" | "float" => term.value.parse::<f64>().ok().map(Value::Float),
        "boolean" => term.value.parse::<bool>().ok().map(Value::Boolean),
        "dateTime" | "dateTimeStamp" => DateTime::parse_from_rfc3339(&term.value)
            .ok()
            .map(|dt| Value::DateTime(dt.with_timezone(&Utc))),
        "json" => serde_json::from_str(&term.value).ok().map(Value::Json),
        _ => return Value::String(term.value.clone()),
    };

    parsed.unwrap_or_else(|| {
        tracing::warn!(
            datatype = %datatype,
            value = %term.value,
            "Literal does not parse as its datatype, keeping raw string"
        );
        Value::String(term.value.clone())
    })
}

/// Turn engine bindings into rows: every variable lands under its plain
/// name and its `alias.name` qualified key, the subject IRI under
/// `subject`, and the derived id under `id`.
pub(crate) fn rows_from_bindings(bindings: Vec<BindingSet>, alias: &str) -> Vec<Row> {
    bindings
        .into_iter()
        .map(|binding| {
            let mut out = Row::new();
            for (var, term) in &binding {
                if var == SUBJECT_KEY {
                    continue;
                }
                let value = value_from_term(term);
                out.insert(format!("{alias}.{var}"), value.clone());
                out.insert(var.clone(), value);
            }
            if let Some(subject) = binding.get(SUBJECT_KEY) {
                let id = Value::String(row::id_from_subject(&subject.value).to_string());
                let subject = Value::String(subject.value.clone());
                out.insert(format!("{alias}.{SUBJECT_KEY}"), subject.clone());
                out.insert(SUBJECT_KEY.to_string(), subject);
                out.insert(format!("{alias}.{ID_KEY}"), id.clone());
                out.insert(ID_KEY.to_string(), id);
            }
            out
        })
        .collect()
}

/// Apply a select projection: output keys are the aliases, values resolved
/// by exact alias, then qualified key, then plain column name.
pub(crate) fn project(rows: Vec<Row>, fields: Option<&[(String, SelectField)]>) -> Vec<Row> {
    let Some(fields) = fields else {
        return rows;
    };
    rows.into_iter()
        .map(|source| {
            let mut out = Row::new();
            for (alias, field) in fields {
                let value = match field {
                    SelectField::Column(column) => {
                        row::lookup_projection(&source, alias, column).cloned()
                    }
                    SelectField::Aggregate(_) => source.get(alias).cloned(),
                };
                out.insert(alias.clone(), value.unwrap_or(Value::Null));
            }
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_domain::ColumnRef;

    fn literal(value: &str, datatype: &str) -> Term {
        Term {
            value: value.to_string(),
            kind: TermKind::Literal {
                datatype: Some(format!("{XSD}{datatype}")),
                language: None,
            },
        }
    }

    #[test]
    fn types_follow_datatypes() {
        assert_eq!(value_from_term(&literal("30", "integer")), Value::Integer(30));
        assert_eq!(value_from_term(&literal("1.5", "double")), Value::Float(1.5));
        assert_eq!(
            value_from_term(&literal("true", "boolean")),
            Value::Boolean(true)
        );
        assert!(matches!(
            value_from_term(&literal("2024-01-01T00:00:00Z", "dateTime")),
            Value::DateTime(_)
        ));
        assert_eq!(
            value_from_term(&literal("{\"a\":1}", "json")),
            Value::Json(serde_json::json!({"a": 1}))
        );
    }

    #[test]
    fn malformed_literals_surface_raw() {
        assert_eq!(
            value_from_term(&literal("not-a-number", "integer")),
            Value::String("not-a-number".to_string())
        );
    }

    #[test]
    fn rows_carry_plain_and_qualified_keys() {
        let mut binding = BindingSet::new();
        binding.insert(
            "subject".to_string(),
            Term {
                value: "https://x/alice/t1#p1".to_string(),
                kind: TermKind::Iri,
            },
        );
        binding.insert("name".to_string(), literal("Alice", "string"));
        let rows = rows_from_bindings(vec![binding], "profiles");
        let row = &rows[0];
        assert_eq!(row.get("name"), Some(&Value::String("Alice".into())));
        assert_eq!(row.get("profiles.name"), Some(&Value::String("Alice".into())));
        assert_eq!(row.get("id"), Some(&Value::String("p1".into())));
        assert_eq!(
            row.get("subject"),
            Some(&Value::String("https://x/alice/t1#p1".into()))
        );
    }

    #[test]
    fn projection_resolves_alias_then_qualified_then_plain() {
        let mut source = Row::new();
        source.insert("users.name".into(), Value::from("Alice"));
        source.insert("title".into(), Value::from("Intro"));
        let fields = vec![
            (
                "authorName".to_string(),
                SelectField::Column(ColumnRef::parse("users.name")),
            ),
            (
                "title".to_string(),
                SelectField::Column(ColumnRef::parse("title")),
            ),
            (
                "missing".to_string(),
                SelectField::Column(ColumnRef::parse("nope")),
            ),
        ];
        let projected = project(vec![source], Some(&fields));
        let row = &projected[0];
        assert_eq!(row.get("authorName"), Some(&Value::from("Alice")));
        assert_eq!(row.get("title"), Some(&Value::from("Intro")));
        assert_eq!(row.get("missing"), Some(&Value::Null));
    }
}
