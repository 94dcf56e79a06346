//! In-process relational steps for requests the remote engine cannot run:
//! joins, post-filters, group-by, aggregation, and the post-merge
//! modifiers.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use pod_domain::{
    ColumnRef, CompareOp, Condition, DomainError, JoinClause, JoinCondition, JoinKind, OrderKey,
    Row, SelectField, SelectOp, SortDirection, Value,
    aggregate::{Aggregate, AggregateFn},
    row,
};
use regex::RegexBuilder;

/// Resolve which side of the first join condition belongs to the joined
/// alias. The builder guarantees exactly one side does.
pub(crate) fn join_sides<'a>(
    join: &'a JoinClause,
    primary: &str,
) -> Result<(&'a ColumnRef, &'a ColumnRef), DomainError> {
    let first = join
        .conditions
        .first()
        .ok_or_else(|| DomainError::EmptyJoinCondition(join.table.name().to_string()))?;
    if first.left.targets(&join.alias, primary) {
        Ok((&first.right, &first.left))
    } else {
        Ok((&first.left, &first.right))
    }
}

/// Distinct non-null values of the base-side join key, in row order.
pub(crate) fn collect_join_keys(rows: &[Row], base_ref: &ColumnRef) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for r in rows {
        if let Some(v) = row::lookup(r, base_ref) {
            if !v.is_null() && seen.insert(v.group_key()) {
                keys.push(v.clone());
            }
        }
    }
    keys
}

/// Hash-merge one join step.
///
/// Joined rows are bucketed by the join key; base rows look up their
/// bucket. Inner joins drop base rows without a match, left joins pad the
/// joined alias with nulls. Multiple matches fan out into a per-base-row
/// Cartesian product. Input order is preserved within the step.
pub(crate) fn merge_join(
    base_rows: Vec<Row>,
    joined_rows: Vec<Row>,
    join: &JoinClause,
    base_ref: &ColumnRef,
    join_ref: &ColumnRef,
) -> Vec<Row> {
    let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, joined) in joined_rows.iter().enumerate() {
        if let Some(v) = row::lookup(joined, join_ref) {
            if !v.is_null() {
                buckets.entry(v.group_key()).or_default().push(idx);
            }
        }
    }

    let prefix = format!("{}.", join.alias);
    let mut out = Vec::new();
    for base in base_rows {
        let matches = row::lookup(&base, base_ref)
            .filter(|v| !v.is_null())
            .and_then(|v| buckets.get(&v.group_key()));
        match matches {
            Some(indices) => {
                for &idx in indices {
                    let mut merged = base.clone();
                    for (key, value) in &joined_rows[idx] {
                        if key.starts_with(&prefix) {
                            merged.insert(key.clone(), value.clone());
                        }
                    }
                    out.push(merged);
                }
            }
            None => {
                if join.kind == JoinKind::Left {
                    let mut merged = base.clone();
                    for column in join.table.columns() {
                        merged.insert(format!("{prefix}{}", column.name()), Value::Null);
                    }
                    merged.insert(format!("{prefix}id"), Value::Null);
                    merged.insert(format!("{prefix}subject"), Value::Null);
                    out.push(merged);
                }
            }
        }
    }
    out
}

/// Evaluate a condition tree against one merged row. Operator semantics
/// mirror the SPARQL filters the translator emits.
pub(crate) fn eval_condition(r: &Row, cond: &Condition) -> bool {
    match cond {
        Condition::Compare { column, op, value } => {
            let Some(cell) = row::lookup(r, column).filter(|c| !c.is_null()) else {
                return false;
            };
            if *op == CompareOp::Like {
                return like_matches(&value.as_id_string(), &cell.as_id_string());
            }
            if value.is_null() {
                return false;
            }
            match op {
                CompareOp::Eq => cell.loose_eq(value),
                CompareOp::Ne => !cell.loose_eq(value),
                CompareOp::Lt => cell.compare(value) == Some(Ordering::Less),
                CompareOp::Lte => matches!(
                    cell.compare(value),
                    Some(Ordering::Less | Ordering::Equal)
                ),
                CompareOp::Gt => cell.compare(value) == Some(Ordering::Greater),
                CompareOp::Gte => matches!(
                    cell.compare(value),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
                CompareOp::Like => unreachable!(),
            }
        }
        Condition::InList {
            column,
            values,
            negated,
        } => match row::lookup(r, column).filter(|c| !c.is_null()) {
            Some(cell) => {
                let contained = values.iter().any(|v| cell.loose_eq(v));
                contained != *negated
            }
            // Null membership: IN matches nothing, NOT IN everything
            None => *negated,
        },
        Condition::Null { column, negated } => {
            let is_null = row::lookup(r, column).is_none_or(Value::is_null);
            is_null != *negated
        }
        Condition::Not(inner) => !eval_condition(r, inner),
        Condition::All(children) => children.iter().all(|c| eval_condition(r, c)),
        Condition::Any(children) => children.iter().any(|c| eval_condition(r, c)),
    }
}

/// Secondary join conditions compare two columns of the merged row.
pub(crate) fn eval_join_condition(r: &Row, pair: &JoinCondition) -> bool {
    match (row::lookup(r, &pair.left), row::lookup(r, &pair.right)) {
        (Some(a), Some(b)) if !a.is_null() && !b.is_null() => a.loose_eq(b),
        _ => false,
    }
}

fn like_matches(pattern: &str, candidate: &str) -> bool {
    RegexBuilder::new(&pod_sparql::like_to_regex(pattern))
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(candidate))
        .unwrap_or(false)
}

fn in_group_by(column: &ColumnRef, group_by: &[ColumnRef]) -> bool {
    group_by.iter().any(|g| {
        g.name == column.name
            && (g.qualifier == column.qualifier
                || g.qualifier.is_none()
                || column.qualifier.is_none())
    })
}

/// Check the select-list rule: once aggregates appear, every plain column
/// must be listed in GROUP BY.
pub(crate) fn validate_projection(op: &SelectOp) -> Result<(), DomainError> {
    let Some(fields) = &op.fields else {
        return Ok(());
    };
    if !op.has_aggregates() {
        return Ok(());
    }
    for (_, field) in fields {
        if let SelectField::Column(column) = field {
            if !in_group_by(column, &op.group_by) {
                return Err(DomainError::UngroupedColumn(column.qualified()));
            }
        }
    }
    Ok(())
}

/// Partition rows by the group-by key tuple and reduce each group through
/// the projected aggregates; plain columns take the group's first value.
///
/// Without group-by columns all rows form one group, so a pure-aggregate
/// select over an empty set still yields one row (`count` 0, the rest
/// null).
pub(crate) fn group_and_aggregate(rows: Vec<Row>, op: &SelectOp) -> Result<Vec<Row>, DomainError> {
    let default_fields;
    let fields: &[(String, SelectField)] = match &op.fields {
        Some(fields) => fields,
        None => {
            default_fields = op
                .table
                .data_columns()
                .map(|c| (c.name().to_string(), SelectField::Column(c.into())))
                .collect::<Vec<_>>();
            &default_fields
        }
    };

    for (_, field) in fields {
        if let SelectField::Column(column) = field {
            if !in_group_by(column, &op.group_by) {
                return Err(DomainError::UngroupedColumn(column.qualified()));
            }
        }
    }

    // Order-preserving partition: first-seen group order is output order
    let mut groups: Vec<Vec<Row>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    if op.group_by.is_empty() {
        groups.push(rows);
    } else {
        for r in rows {
            let key = op
                .group_by
                .iter()
                .map(|g| {
                    row::lookup(&r, g)
                        .map(Value::group_key)
                        .unwrap_or_else(|| "null".to_string())
                })
                .collect::<Vec<_>>()
                .join("\u{1f}");
            match index.get(&key) {
                Some(&at) => groups[at].push(r),
                None => {
                    index.insert(key, groups.len());
                    groups.push(vec![r]);
                }
            }
        }
    }

    Ok(groups
        .into_iter()
        .map(|group| {
            let mut out = Row::new();
            for (alias, field) in fields {
                let value = match field {
                    SelectField::Aggregate(agg) => compute_aggregate(agg, &group),
                    SelectField::Column(column) => group
                        .first()
                        .and_then(|r| row::lookup(r, column))
                        .cloned()
                        .unwrap_or(Value::Null),
                };
                out.insert(alias.clone(), value);
            }
            out
        })
        .collect())
}

fn compute_aggregate(agg: &Aggregate, group: &[Row]) -> Value {
    let Some(column) = &agg.column else {
        // count() with no column counts rows
        return Value::Integer(group.len() as i64);
    };

    let mut values: Vec<&Value> = group
        .iter()
        .filter_map(|r| row::lookup(r, column))
        .filter(|v| !v.is_null())
        .collect();
    if agg.distinct {
        let mut seen = HashSet::new();
        values.retain(|v| seen.insert(v.group_key()));
    }

    if agg.func == AggregateFn::Count {
        return Value::Integer(values.len() as i64);
    }

    let numeric: Vec<(f64, &Value)> = values
        .iter()
        .filter_map(|v| v.as_number().map(|n| (n, *v)))
        .collect();
    if numeric.is_empty() {
        return Value::Null;
    }

    match agg.func {
        AggregateFn::Sum => sum_value(&numeric),
        AggregateFn::Avg => {
            let total: f64 = numeric.iter().map(|(n, _)| n).sum();
            Value::Float(total / numeric.len() as f64)
        }
        AggregateFn::Min => numeric
            .iter()
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
            .map(|(_, v)| (*v).clone())
            .unwrap_or(Value::Null),
        AggregateFn::Max => numeric
            .iter()
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
            .map(|(_, v)| (*v).clone())
            .unwrap_or(Value::Null),
        AggregateFn::Count => unreachable!("count is handled above"),
    }
}

fn sum_value(numeric: &[(f64, &Value)]) -> Value {
    if numeric.iter().all(|(_, v)| matches!(**v, Value::Integer(_))) {
        Value::Integer(numeric.iter().map(|(n, _)| *n as i64).sum())
    } else {
        Value::Float(numeric.iter().map(|(n, _)| n).sum())
    }
}

/// DISTINCT over projected rows, first occurrence wins.
pub(crate) fn apply_distinct(rows: Vec<Row>) -> Vec<Row> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|r| seen.insert(row::row_key(r)))
        .collect()
}

/// Stable multi-key sort; nulls sort last regardless of direction.
pub(crate) fn apply_order(rows: &mut [Row], keys: &[OrderKey]) {
    if keys.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for key in keys {
            let av = row::lookup(a, &key.column).filter(|v| !v.is_null());
            let bv = row::lookup(b, &key.column).filter(|v| !v.is_null());
            let ord = match (av, bv) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => {
                    let ord = x
                        .compare(y)
                        .unwrap_or_else(|| x.group_key().cmp(&y.group_key()));
                    match key.direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                }
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

pub(crate) fn apply_page(rows: Vec<Row>, offset: Option<u64>, limit: Option<u64>) -> Vec<Row> {
    let mut iter = rows.into_iter().skip(offset.unwrap_or(0) as usize);
    match limit {
        Some(limit) => iter.by_ref().take(limit as usize).collect(),
        None => iter.collect(),
    }
}
