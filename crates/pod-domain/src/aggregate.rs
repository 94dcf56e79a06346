use crate::condition::ColumnRef;

/// Aggregate function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFn {
    pub fn sparql_name(&self) -> &'static str {
        match self {
            AggregateFn::Count => "COUNT",
            AggregateFn::Sum => "SUM",
            AggregateFn::Avg => "AVG",
            AggregateFn::Min => "MIN",
            AggregateFn::Max => "MAX",
        }
    }
}

/// An aggregate projection entry.
///
/// `count()` may omit the column (counting rows); the other functions take
/// a column by construction, so an aggregate without one cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub func: AggregateFn,
    pub column: Option<ColumnRef>,
    pub distinct: bool,
}

impl Aggregate {
    fn new(func: AggregateFn, column: Option<ColumnRef>) -> Self {
        Self {
            func,
            column,
            distinct: false,
        }
    }

    /// Deduplicate values before reduction.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

/// `count()` with no column counts all rows of the group.
pub fn count() -> Aggregate {
    Aggregate::new(AggregateFn::Count, None)
}

/// `count(column)` counts rows where the column is non-null.
pub fn count_column(column: impl Into<ColumnRef>) -> Aggregate {
    Aggregate::new(AggregateFn::Count, Some(column.into()))
}

pub fn sum(column: impl Into<ColumnRef>) -> Aggregate {
    Aggregate::new(AggregateFn::Sum, Some(column.into()))
}

pub fn avg(column: impl Into<ColumnRef>) -> Aggregate {
    Aggregate::new(AggregateFn::Avg, Some(column.into()))
}

pub fn min(column: impl Into<ColumnRef>) -> Aggregate {
    Aggregate::new(AggregateFn::Min, Some(column.into()))
}

pub fn max(column: impl Into<ColumnRef>) -> Aggregate {
    Aggregate::new(AggregateFn::Max, Some(column.into()))
}
