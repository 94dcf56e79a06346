use pod_domain::{
    Condition, PodLocation, SelectField, SelectOp, SortDirection, Table,
};

use crate::{
    error::Result,
    filter::{FilterContext, check_columns, render_condition, var_name},
};

/// Render the graph pattern shared by data selects and subject discovery:
/// the class constraint plus one (possibly OPTIONAL) triple per data
/// column.
fn render_pattern(table: &Table, filter: Option<&Condition>, location: &PodLocation) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("  ?subject a <{}> .\n", table.rdf_class()));
    for column in table.data_columns() {
        let triple = format!(
            "?subject <{}> ?{} .",
            column.predicate_iri(),
            var_name(column.name())
        );
        if column.is_required() {
            out.push_str(&format!("  {triple}\n"));
        } else {
            out.push_str(&format!("  OPTIONAL {{ {triple} }}\n"));
        }
    }
    if let Some(cond) = filter {
        check_columns(cond, table)?;
        let ctx = FilterContext { table, location };
        out.push_str(&format!("  FILTER({})\n", render_condition(cond, &ctx)?));
    }
    Ok(out)
}

/// Render the SELECT clause: all column variables, or aggregate
/// expressions plus group keys when the projection aggregates.
fn render_projection(op: &SelectOp) -> String {
    if op.has_aggregates() {
        let mut parts = Vec::new();
        for (alias, field) in op.fields.as_deref().unwrap_or_default() {
            match field {
                SelectField::Aggregate(agg) => {
                    let distinct = if agg.distinct { "DISTINCT " } else { "" };
                    let expr = match &agg.column {
                        Some(column) => format!("?{}", var_name(&column.name)),
                        None => "*".to_string(),
                    };
                    parts.push(format!(
                        "({}({distinct}{expr}) AS ?{})",
                        agg.func.sparql_name(),
                        var_name(alias)
                    ));
                }
                SelectField::Column(column) => {
                    parts.push(format!("?{}", var_name(&column.name)));
                }
            }
        }
        parts.join(" ")
    } else {
        let mut parts = vec!["?subject".to_string()];
        parts.extend(
            op.table
                .data_columns()
                .map(|c| format!("?{}", var_name(c.name()))),
        );
        parts.join(" ")
    }
}

pub(crate) fn render_select(
    header: &str,
    op: &SelectOp,
    location: &PodLocation,
) -> Result<String> {
    let mut query = String::from(header);
    let distinct = if op.distinct { "DISTINCT " } else { "" };
    query.push_str(&format!("SELECT {distinct}{} WHERE {{\n", render_projection(op)));
    query.push_str(&render_pattern(&op.table, op.filter.as_ref(), location)?);
    query.push('}');

    if !op.group_by.is_empty() {
        let keys: Vec<String> = op
            .group_by
            .iter()
            .map(|c| format!("?{}", var_name(&c.name)))
            .collect();
        query.push_str(&format!("\nGROUP BY {}", keys.join(" ")));
    }
    if !op.order_by.is_empty() {
        let id_column = op.table.id_column_name();
        let keys: Vec<String> = op
            .order_by
            .iter()
            .map(|key| {
                // The id never binds a variable of its own; sort by subject
                let var = if key.column.qualifier.is_none() && key.column.name == id_column {
                    "subject".to_string()
                } else {
                    var_name(&key.column.name)
                };
                match key.direction {
                    SortDirection::Asc => format!("ASC(?{var})"),
                    SortDirection::Desc => format!("DESC(?{var})"),
                }
            })
            .collect();
        query.push_str(&format!("\nORDER BY {}", keys.join(" ")));
    }
    if let Some(limit) = op.limit {
        query.push_str(&format!("\nLIMIT {limit}"));
    }
    if let Some(offset) = op.offset {
        query.push_str(&format!("\nOFFSET {offset}"));
    }
    Ok(query)
}

/// Discovery query for conditional updates and deletes: same pattern, but
/// only `?subject` is projected.
pub(crate) fn render_subject_select(
    header: &str,
    table: &Table,
    filter: Option<&Condition>,
    location: &PodLocation,
) -> Result<String> {
    let mut query = String::from(header);
    query.push_str("SELECT ?subject WHERE {\n");
    query.push_str(&render_pattern(table, filter, location)?);
    query.push('}');
    Ok(query)
}
