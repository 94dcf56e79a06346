use std::collections::BTreeMap;

use crate::{
    Table, Value,
    aggregate::Aggregate,
    condition::{ColumnRef, Condition},
};

/// One projected output of a select: either a column reference or an
/// aggregate expression, keyed by its output alias.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectField {
    Column(ColumnRef),
    Aggregate(Aggregate),
}

impl From<ColumnRef> for SelectField {
    fn from(c: ColumnRef) -> Self {
        SelectField::Column(c)
    }
}

impl From<&crate::Column> for SelectField {
    fn from(c: &crate::Column) -> Self {
        SelectField::Column(c.into())
    }
}

impl From<&str> for SelectField {
    fn from(s: &str) -> Self {
        SelectField::Column(ColumnRef::parse(s))
    }
}

impl From<Aggregate> for SelectField {
    fn from(a: Aggregate) -> Self {
        SelectField::Aggregate(a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One ORDER BY key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderKey {
    pub column: ColumnRef,
    pub direction: SortDirection,
}

/// Join flavor. Right and full joins are not part of the dialect, so the
/// enum cannot express them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

/// A single `left.col = right.col` join equality.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinCondition {
    pub left: ColumnRef,
    pub right: ColumnRef,
}

/// A registered join: target table, assigned alias, and its conditions.
///
/// Only the first condition drives the hash merge; the rest are evaluated
/// as post-filters on merged rows.
#[derive(Debug, Clone)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: Table,
    pub alias: String,
    pub conditions: Vec<JoinCondition>,
}

/// Select request IR.
#[derive(Debug, Clone)]
pub struct SelectOp {
    pub table: Table,
    pub alias: String,
    /// Output alias → field; `None` projects all columns except the id.
    pub fields: Option<Vec<(String, SelectField)>>,
    /// Condition over the primary table, pushed into SPARQL.
    pub filter: Option<Condition>,
    /// Conditions referencing joined aliases, evaluated after the merge.
    pub join_filters: Vec<Condition>,
    pub joins: Vec<JoinClause>,
    pub group_by: Vec<ColumnRef>,
    pub order_by: Vec<OrderKey>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub distinct: bool,
}

impl SelectOp {
    pub fn new(table: Table) -> Self {
        let alias = table.name().to_string();
        Self {
            table,
            alias,
            fields: None,
            filter: None,
            join_filters: Vec::new(),
            joins: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            distinct: false,
        }
    }

    /// True when any projected field is an aggregate.
    pub fn has_aggregates(&self) -> bool {
        self.fields
            .as_ref()
            .is_some_and(|fields| {
                fields
                    .iter()
                    .any(|(_, f)| matches!(f, SelectField::Aggregate(_)))
            })
    }

    /// A request is engine-native only without joins, group-by, and
    /// aggregates; anything else goes through the fallback planner.
    pub fn requires_fallback(&self) -> bool {
        !self.joins.is_empty() || !self.group_by.is_empty() || self.has_aggregates()
    }
}

/// A single value row, keyed by column name.
pub type ValueRow = BTreeMap<String, Value>;

/// Insert request IR; `rows` may hold one record or a batch.
#[derive(Debug, Clone)]
pub struct InsertOp {
    pub table: Table,
    pub rows: Vec<ValueRow>,
}

/// Update request IR.
#[derive(Debug, Clone)]
pub struct UpdateOp {
    pub table: Table,
    pub changes: ValueRow,
    pub filter: Condition,
}

/// Delete request IR; a missing filter deletes every row of the class.
#[derive(Debug, Clone)]
pub struct DeleteOp {
    pub table: Table,
    pub filter: Option<Condition>,
}
