use std::collections::HashSet;

use chrono::Utc;
use pod_domain::{DomainError, InsertOp, PodLocation, Table, Value, ValueRow};

use crate::{error::Result, literal::format_term};

/// A compiled insert: the update statement plus the subject IRI of every
/// row, in batch order.
#[derive(Debug)]
pub struct InsertStatement {
    pub update: String,
    pub subjects: Vec<String>,
}

/// Render an `INSERT DATA` statement for the whole batch.
///
/// Each row gets a subject from its id field, falling back to the current
/// time in milliseconds. Two rows sharing an id abort the batch before any
/// SPARQL leaves the process.
pub(crate) fn render_insert(
    header: &str,
    op: &InsertOp,
    location: &PodLocation,
) -> Result<InsertStatement> {
    let id_column = op.table.id_column_name();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut subjects = Vec::with_capacity(op.rows.len());
    let mut triples = String::new();

    for row in &op.rows {
        check_row_columns(&op.table, row)?;
        let id = match row.get(id_column) {
            Some(v) if !v.is_null() => v.as_id_string(),
            _ => Utc::now().timestamp_millis().to_string(),
        };
        if !seen_ids.insert(id.clone()) {
            return Err(DomainError::DuplicateId(id).into());
        }

        let subject = location.subject_uri(&op.table, &id);
        triples.push_str(&format!("  <{subject}> a <{}> .\n", op.table.rdf_class()));
        for column in op.table.data_columns() {
            let value = row.get(column.name()).or(column.default());
            let value = match value {
                Some(v) if !v.is_null() => v,
                _ => continue,
            };
            triples.push_str(&format!(
                "  <{subject}> <{}> {} .\n",
                column.predicate_iri(),
                format_term(column, value)?
            ));
        }
        subjects.push(subject);
    }

    let update = format!("{header}INSERT DATA {{\n{triples}}}");
    Ok(InsertStatement { update, subjects })
}

/// Per-subject update: one `DELETE WHERE` per touched predicate, then a
/// single `INSERT DATA` carrying the non-null replacements.
pub(crate) fn render_update_subject(
    header: &str,
    table: &Table,
    changes: &ValueRow,
    subject: &str,
) -> Result<String> {
    check_row_columns(table, changes)?;

    let mut statements = Vec::new();
    let mut inserts = String::new();
    for (index, column) in table.data_columns().enumerate() {
        let Some(value) = changes.get(column.name()) else {
            continue;
        };
        statements.push(format!(
            "DELETE WHERE {{ <{subject}> <{}> ?v{index} . }}",
            column.predicate_iri()
        ));
        if !value.is_null() {
            inserts.push_str(&format!(
                "  <{subject}> <{}> {} .\n",
                column.predicate_iri(),
                format_term(column, value)?
            ));
        }
    }
    if !inserts.is_empty() {
        statements.push(format!("INSERT DATA {{\n{inserts}}}"));
    }
    Ok(format!("{header}{}", statements.join(";\n")))
}

/// Remove every triple of one subject.
pub(crate) fn render_delete_subject(header: &str, subject: &str) -> String {
    format!("{header}DELETE WHERE {{ <{subject}> ?p ?o . }}")
}

/// Remove every row of the table's class.
pub(crate) fn render_delete_class(header: &str, table: &Table) -> String {
    format!(
        "{header}DELETE WHERE {{ ?subject a <{}> . ?subject ?p ?o . }}",
        table.rdf_class()
    )
}

fn check_row_columns(table: &Table, row: &ValueRow) -> Result<()> {
    let id_column = table.id_column_name();
    for name in row.keys() {
        if name != id_column && name != "id" && table.column(name).is_none() {
            return Err(DomainError::UnknownColumn {
                table: table.name().to_string(),
                column: name.clone(),
            }
            .into());
        }
    }
    Ok(())
}
