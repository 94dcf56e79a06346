use crate::{Column, Value};

/// A possibly alias-qualified column reference.
///
/// `qualifier: None` means the primary table of the request. Dotted strings
/// like `"posts.authorId"` parse into qualifier + name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn parse(s: &str) -> Self {
        match s.split_once('.') {
            Some((qualifier, name)) => Self {
                qualifier: Some(qualifier.to_string()),
                name: name.to_string(),
            },
            None => Self {
                qualifier: None,
                name: s.to_string(),
            },
        }
    }

    /// Display form: `alias.column` or bare `column`.
    pub fn qualified(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{q}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// True when this reference targets the given alias (unqualified refs
    /// target the primary alias).
    pub fn targets(&self, alias: &str, primary: &str) -> bool {
        match &self.qualifier {
            Some(q) => q == alias,
            None => alias == primary,
        }
    }
}

impl From<&Column> for ColumnRef {
    fn from(column: &Column) -> Self {
        Self {
            qualifier: None,
            name: column.name().to_string(),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for ColumnRef {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// Comparison operator of a binary condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
}

/// Immutable boolean condition tree shared by the SPARQL translator and the
/// fallback planner.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column: ColumnRef,
        op: CompareOp,
        value: Value,
    },
    InList {
        column: ColumnRef,
        values: Vec<Value>,
        negated: bool,
    },
    Null {
        column: ColumnRef,
        negated: bool,
    },
    Not(Box<Condition>),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

pub fn eq(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
    Condition::Compare {
        column: column.into(),
        op: CompareOp::Eq,
        value: value.into(),
    }
}

pub fn ne(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
    Condition::Compare {
        column: column.into(),
        op: CompareOp::Ne,
        value: value.into(),
    }
}

pub fn lt(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
    Condition::Compare {
        column: column.into(),
        op: CompareOp::Lt,
        value: value.into(),
    }
}

pub fn lte(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
    Condition::Compare {
        column: column.into(),
        op: CompareOp::Lte,
        value: value.into(),
    }
}

pub fn gt(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
    Condition::Compare {
        column: column.into(),
        op: CompareOp::Gt,
        value: value.into(),
    }
}

pub fn gte(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
    Condition::Compare {
        column: column.into(),
        op: CompareOp::Gte,
        value: value.into(),
    }
}

/// SQL LIKE: `%` matches any run of characters, `_` a single character,
/// case-insensitively.
pub fn like(column: impl Into<ColumnRef>, pattern: impl Into<String>) -> Condition {
    Condition::Compare {
        column: column.into(),
        op: CompareOp::Like,
        value: Value::String(pattern.into()),
    }
}

pub fn in_array<V: Into<Value>>(
    column: impl Into<ColumnRef>,
    values: impl IntoIterator<Item = V>,
) -> Condition {
    Condition::InList {
        column: column.into(),
        values: values.into_iter().map(Into::into).collect(),
        negated: false,
    }
}

pub fn not_in_array<V: Into<Value>>(
    column: impl Into<ColumnRef>,
    values: impl IntoIterator<Item = V>,
) -> Condition {
    Condition::InList {
        column: column.into(),
        values: values.into_iter().map(Into::into).collect(),
        negated: true,
    }
}

pub fn is_null(column: impl Into<ColumnRef>) -> Condition {
    Condition::Null {
        column: column.into(),
        negated: false,
    }
}

pub fn is_not_null(column: impl Into<ColumnRef>) -> Condition {
    Condition::Null {
        column: column.into(),
        negated: true,
    }
}

pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::All(conditions.into_iter().collect())
}

pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::Any(conditions.into_iter().collect())
}

pub fn not(condition: Condition) -> Condition {
    Condition::Not(Box::new(condition))
}

/// Map entry value for plain-map where clauses: a single value, a list
/// (meaning `IN`), or null (meaning `IS NULL`).
#[derive(Debug, Clone)]
pub enum FieldValue {
    One(Value),
    Many(Vec<Value>),
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::One(v)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::One(s.into())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::One(s.into())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::One(n.into())
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::One(n.into())
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::One(f.into())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::One(b.into())
    }
}

impl<V: Into<Value>> From<Vec<V>> for FieldValue {
    fn from(values: Vec<V>) -> Self {
        FieldValue::Many(values.into_iter().map(Into::into).collect())
    }
}

impl Condition {
    /// Plain-map where clause: implicit AND of equalities, null meaning
    /// `IS NULL`, lists meaning `IN`.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Condition
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let children = entries
            .into_iter()
            .map(|(key, value)| {
                let column = ColumnRef::parse(&key.into());
                match value.into() {
                    FieldValue::One(Value::Null) => Condition::Null {
                        column,
                        negated: false,
                    },
                    FieldValue::One(value) => Condition::Compare {
                        column,
                        op: CompareOp::Eq,
                        value,
                    },
                    FieldValue::Many(values) => Condition::InList {
                        column,
                        values,
                        negated: false,
                    },
                }
            })
            .collect::<Vec<_>>();
        if children.len() == 1 {
            children.into_iter().next().unwrap()
        } else {
            Condition::All(children)
        }
    }

    /// Walk all column references in the tree.
    pub fn for_each_column<'a>(&'a self, f: &mut impl FnMut(&'a ColumnRef)) {
        match self {
            Condition::Compare { column, .. }
            | Condition::InList { column, .. }
            | Condition::Null { column, .. } => f(column),
            Condition::Not(inner) => inner.for_each_column(f),
            Condition::All(children) | Condition::Any(children) => {
                for child in children {
                    child.for_each_column(f);
                }
            }
        }
    }

    /// True when any reference is qualified with an alias other than the
    /// primary one.
    pub fn references_non_primary(&self, primary: &str) -> bool {
        let mut found = false;
        self.for_each_column(&mut |c| {
            if let Some(q) = &c.qualifier {
                if q != primary {
                    found = true;
                }
            }
        });
        found
    }

    /// Split into (primary-table condition, join-filter conditions).
    ///
    /// Top-level AND children that touch joined aliases become post-merge
    /// filters; anything else that touches a joined alias moves wholesale.
    pub fn split_join_filters(self, primary: &str) -> (Option<Condition>, Vec<Condition>) {
        if !self.references_non_primary(primary) {
            return (Some(self), Vec::new());
        }
        match self {
            Condition::All(children) => {
                let mut local = Vec::new();
                let mut joined = Vec::new();
                for child in children {
                    if child.references_non_primary(primary) {
                        joined.push(child);
                    } else {
                        local.push(child);
                    }
                }
                let local = match local.len() {
                    0 => None,
                    1 => Some(local.into_iter().next().unwrap()),
                    _ => Some(Condition::All(local)),
                };
                (local, joined)
            }
            other => (None, vec![other]),
        }
    }

    /// If the condition narrows to one or more id values (`id = v` or
    /// `id IN (...)` on the given id column), return them.
    pub fn id_values(&self, id_column: &str) -> Option<Vec<String>> {
        match self {
            Condition::Compare {
                column,
                op: CompareOp::Eq,
                value,
            } if column.qualifier.is_none() && column.name == id_column && !value.is_null() => {
                Some(vec![value.as_id_string()])
            }
            Condition::InList {
                column,
                values,
                negated: false,
            } if column.qualifier.is_none() && column.name == id_column => {
                Some(values.iter().map(Value::as_id_string).collect())
            }
            _ => None,
        }
    }
}
