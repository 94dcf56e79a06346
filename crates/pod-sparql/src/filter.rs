use pod_domain::{
    ColumnRef, CompareOp, Condition, DomainError, PodLocation, Table, Value,
};

use crate::{
    error::Result,
    literal::{escape_string, format_term, format_untyped},
};

/// SPARQL variable derived from a column name; anything outside
/// `[A-Za-z0-9_]` is flattened to `_`.
pub fn var_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Translate a LIKE pattern into an anchored regex: `%` → `.*`, `_` → `.`,
/// everything else matched literally.
pub fn like_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('^');
    for c in pattern.chars() {
        match c {
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
            | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('$');
    out
}

pub(crate) struct FilterContext<'a> {
    pub table: &'a Table,
    pub location: &'a PodLocation,
}

impl FilterContext<'_> {
    fn is_id(&self, column: &ColumnRef) -> bool {
        let local = match &column.qualifier {
            None => true,
            Some(q) => q == self.table.name(),
        };
        local && column.name == self.table.id_column_name()
    }

    fn term(&self, column: &ColumnRef, value: &Value) -> Result<String> {
        match self.table.column(&column.name) {
            Some(col) => format_term(col, value),
            None => Ok(format_untyped(value)),
        }
    }
}

/// Render a condition tree into a SPARQL boolean expression (the inside of
/// a `FILTER(...)`).
///
/// Filters on the id column are rewritten to `?subject` comparisons against
/// full subject IRIs.
pub(crate) fn render_condition(cond: &Condition, ctx: &FilterContext<'_>) -> Result<String> {
    Ok(match cond {
        Condition::Compare { column, op, value } if ctx.is_id(column) => {
            let subject = ctx.location.subject_uri(ctx.table, &value.as_id_string());
            match op {
                CompareOp::Eq => format!("?subject = <{subject}>"),
                CompareOp::Ne => format!("?subject != <{subject}>"),
                // Range/LIKE over ids compare the stringified subject
                CompareOp::Like => {
                    let regex = like_to_regex(&value.as_id_string());
                    format!("regex(str(?subject), \"{}\", \"i\")", escape_string(&regex))
                }
                other => format!(
                    "str(?subject) {} \"{}\"",
                    compare_symbol(*other),
                    escape_string(&subject)
                ),
            }
        }
        Condition::Compare { column, op, value } => {
            let var = var_name(&column.name);
            match op {
                CompareOp::Like => {
                    let regex = like_to_regex(&value.as_id_string());
                    format!("regex(str(?{var}), \"{}\", \"i\")", escape_string(&regex))
                }
                other => {
                    format!("?{var} {} {}", compare_symbol(*other), ctx.term(column, value)?)
                }
            }
        }
        Condition::InList {
            column,
            values,
            negated,
        } if ctx.is_id(column) => {
            let subjects: Vec<String> = values
                .iter()
                .map(|v| format!("<{}>", ctx.location.subject_uri(ctx.table, &v.as_id_string())))
                .collect();
            let keyword = if *negated { "NOT IN" } else { "IN" };
            format!("?subject {keyword} ({})", subjects.join(", "))
        }
        Condition::InList {
            column,
            values,
            negated,
        } => {
            let var = var_name(&column.name);
            let terms = values
                .iter()
                .map(|v| ctx.term(column, v))
                .collect::<Result<Vec<_>>>()?;
            let keyword = if *negated { "NOT IN" } else { "IN" };
            format!("?{var} {keyword} ({})", terms.join(", "))
        }
        Condition::Null { column, negated } => {
            let var = var_name(&column.name);
            if *negated {
                format!("BOUND(?{var})")
            } else {
                format!("!BOUND(?{var})")
            }
        }
        Condition::Not(inner) => format!("!({})", render_condition(inner, ctx)?),
        Condition::All(children) => {
            if children.is_empty() {
                "true".to_string()
            } else {
                let parts = children
                    .iter()
                    .map(|c| render_condition(c, ctx))
                    .collect::<Result<Vec<_>>>()?;
                format!("({})", parts.join(" && "))
            }
        }
        Condition::Any(children) => {
            if children.is_empty() {
                "false".to_string()
            } else {
                let parts = children
                    .iter()
                    .map(|c| render_condition(c, ctx))
                    .collect::<Result<Vec<_>>>()?;
                format!("({})", parts.join(" || "))
            }
        }
    })
}

fn compare_symbol(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "=",
        CompareOp::Ne => "!=",
        CompareOp::Lt => "<",
        CompareOp::Lte => "<=",
        CompareOp::Gt => ">",
        CompareOp::Gte => ">=",
        CompareOp::Like => unreachable!("LIKE renders as regex"),
    }
}

/// Collect the column names a condition mentions, for error checking.
pub(crate) fn referenced_columns(cond: &Condition) -> Vec<String> {
    let mut names = Vec::new();
    cond.for_each_column(&mut |c| names.push(c.name.clone()));
    names
}

/// Validate that every referenced column exists on the table (the id field
/// is always addressable).
pub(crate) fn check_columns(cond: &Condition, table: &Table) -> Result<()> {
    for name in referenced_columns(cond) {
        if name != table.id_column_name() && name != "id" && table.column(&name).is_none() {
            return Err(DomainError::UnknownColumn {
                table: table.name().to_string(),
                column: name,
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_transform() {
        assert_eq!(like_to_regex("search%"), "^search.*$");
        assert_eq!(like_to_regex("a_c"), "^a.c$");
        assert_eq!(like_to_regex("50%+"), "^50.*\\+$");
    }

    #[test]
    fn var_names_are_sanitized() {
        assert_eq!(var_name("createdAt"), "createdAt");
        assert_eq!(var_name("weird-name"), "weird_name");
    }
}
