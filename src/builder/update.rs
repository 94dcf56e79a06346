use std::sync::Arc;

use pod_domain::{Condition, DomainError, FieldValue, Table, UpdateOp, Value, ValueRow};
use pod_store::{MutationOutcome, PodStore, Result};

use super::select::combine;

/// Builder for updates: `.set(...)` then `.filter(...)`. Executing without
/// a filter is a programmer error.
pub struct UpdateBuilder {
    store: Arc<PodStore>,
    table: Table,
    changes: ValueRow,
    conditions: Vec<Condition>,
}

impl UpdateBuilder {
    pub(crate) fn new(store: Arc<PodStore>, table: Table) -> Self {
        Self {
            store,
            table,
            changes: ValueRow::new(),
            conditions: Vec::new(),
        }
    }

    /// Columns to rewrite; a null value removes the triple.
    pub fn set<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.changes.insert(key.into(), value.into());
        }
        self
    }

    /// Add a condition; repeated calls AND together.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Plain-map where clause.
    pub fn filter_by<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.conditions.push(Condition::from_entries(entries));
        self
    }

    pub async fn execute(self) -> Result<Vec<MutationOutcome>> {
        let filter = combine(self.conditions).ok_or(DomainError::UpdateWithoutFilter)?;
        self.store
            .update(UpdateOp {
                table: self.table,
                changes: self.changes,
                filter,
            })
            .await
    }
}
