use std::sync::Arc;

use pod_domain::{
    ColumnRef, Condition, DomainError, FieldValue, JoinClause, JoinCondition, JoinKind, OrderKey,
    Row, SelectField, SelectOp, SortDirection, Table,
    condition::and,
};
use pod_store::{PodStore, Result};

/// Builder for select requests.
pub struct SelectBuilder {
    store: Arc<PodStore>,
    fields: Option<Vec<(String, SelectField)>>,
    table: Option<Table>,
    conditions: Vec<Condition>,
    joins: Vec<JoinClause>,
    aliases: Vec<String>,
    group_by: Vec<ColumnRef>,
    order_by: Vec<OrderKey>,
    limit: Option<i64>,
    offset: Option<i64>,
    distinct: bool,
    pending_error: Option<DomainError>,
}

impl SelectBuilder {
    pub(crate) fn new(store: Arc<PodStore>) -> Self {
        Self {
            store,
            fields: None,
            table: None,
            conditions: Vec::new(),
            joins: Vec::new(),
            aliases: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            distinct: false,
            pending_error: None,
        }
    }

    /// Projection: output alias → column or aggregate. Without it every
    /// column except the id is returned.
    pub fn fields<S>(mut self, fields: impl IntoIterator<Item = (S, SelectField)>) -> Self
    where
        S: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(alias, field)| (alias.into(), field))
            .collect();
        self.fields = Some(fields);
        self
    }

    /// Add one projected field.
    pub fn field(mut self, alias: impl Into<String>, field: impl Into<SelectField>) -> Self {
        self.fields
            .get_or_insert_with(Vec::new)
            .push((alias.into(), field.into()));
        self
    }

    /// Primary table; its name becomes the base alias.
    pub fn from(mut self, table: &Table) -> Self {
        self.aliases.insert(0, table.name().to_string());
        self.table = Some(table.clone());
        self
    }

    /// Add a condition; repeated calls AND together.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Plain-map where clause: implicit AND of equalities, null meaning
    /// `IS NULL`, lists meaning `IN`.
    pub fn filter_by<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.conditions.push(Condition::from_entries(entries));
        self
    }

    /// Inner join; `on` pairs are `"left.col" = "right.col"` references and
    /// each pair must mention the joined table's alias on exactly one side.
    pub fn inner_join<L, R>(
        self,
        table: &Table,
        on: impl IntoIterator<Item = (L, R)>,
    ) -> Self
    where
        L: AsRef<str>,
        R: AsRef<str>,
    {
        self.join(JoinKind::Inner, table, on)
    }

    /// Left join; unmatched base rows survive with nulls for the joined
    /// columns.
    pub fn left_join<L, R>(self, table: &Table, on: impl IntoIterator<Item = (L, R)>) -> Self
    where
        L: AsRef<str>,
        R: AsRef<str>,
    {
        self.join(JoinKind::Left, table, on)
    }

    fn join<L, R>(
        mut self,
        kind: JoinKind,
        table: &Table,
        on: impl IntoIterator<Item = (L, R)>,
    ) -> Self
    where
        L: AsRef<str>,
        R: AsRef<str>,
    {
        let alias = self.unique_alias(table.name());
        let mut conditions = Vec::new();
        for (left, right) in on {
            let left = ColumnRef::parse(left.as_ref());
            let right = ColumnRef::parse(right.as_ref());
            let left_joined = left.qualifier.as_deref() == Some(alias.as_str());
            let right_joined = right.qualifier.as_deref() == Some(alias.as_str());
            if left_joined == right_joined {
                self.remember(DomainError::JoinConditionScope {
                    left: left.qualified(),
                    right: right.qualified(),
                    alias: alias.clone(),
                });
            }
            conditions.push(JoinCondition { left, right });
        }
        if conditions.is_empty() {
            self.remember(DomainError::EmptyJoinCondition(table.name().to_string()));
        }
        self.aliases.push(alias.clone());
        self.joins.push(JoinClause {
            kind,
            table: table.clone(),
            alias,
            conditions,
        });
        self
    }

    /// Append a group-by column.
    pub fn group_by(mut self, column: impl Into<ColumnRef>) -> Self {
        self.group_by.push(column.into());
        self
    }

    /// Append an order key.
    pub fn order_by(mut self, column: impl Into<ColumnRef>, direction: SortDirection) -> Self {
        self.order_by.push(OrderKey {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    fn remember(&mut self, error: DomainError) {
        if self.pending_error.is_none() {
            self.pending_error = Some(error);
        }
    }

    fn unique_alias(&self, name: &str) -> String {
        if !self.aliases.iter().any(|a| a == name) {
            return name.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{name}_{counter}");
            if !self.aliases.iter().any(|a| a == &candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Run the request and return its rows.
    pub async fn execute(self) -> Result<Vec<Row>> {
        if let Some(error) = self.pending_error {
            return Err(error.into());
        }
        let table = self.table.ok_or(DomainError::MissingTable)?;
        let limit = validate_bound(self.limit, DomainError::InvalidLimit)?;
        let offset = validate_bound(self.offset, DomainError::InvalidOffset)?;

        let mut op = SelectOp::new(table);
        op.fields = self.fields;
        op.joins = self.joins;
        op.group_by = self.group_by;
        op.order_by = self.order_by;
        op.limit = limit;
        op.offset = offset;
        op.distinct = self.distinct;

        let combined = combine(self.conditions);
        if let Some(condition) = combined {
            let (local, join_filters) = condition.split_join_filters(&op.alias);
            op.filter = local;
            op.join_filters = join_filters;
        }

        self.store.select(op).await
    }
}

pub(crate) fn combine(mut conditions: Vec<Condition>) -> Option<Condition> {
    match conditions.len() {
        0 => None,
        1 => conditions.pop(),
        _ => Some(and(conditions)),
    }
}

pub(crate) fn validate_bound(
    value: Option<i64>,
    err: fn(i64) -> DomainError,
) -> std::result::Result<Option<u64>, DomainError> {
    match value {
        None => Ok(None),
        Some(v) if v >= 0 => Ok(Some(v as u64)),
        Some(v) => Err(err(v)),
    }
}
