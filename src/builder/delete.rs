use std::sync::Arc;

use pod_domain::{Condition, DeleteOp, FieldValue, Table};
use pod_store::{MutationOutcome, PodStore, Result};

use super::select::combine;

/// Builder for deletes. Without a filter every row of the table's class is
/// removed.
pub struct DeleteBuilder {
    store: Arc<PodStore>,
    table: Table,
    conditions: Vec<Condition>,
}

impl DeleteBuilder {
    pub(crate) fn new(store: Arc<PodStore>, table: Table) -> Self {
        Self {
            store,
            table,
            conditions: Vec::new(),
        }
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
        self.store
            .delete(DeleteOp {
                table: self.table,
                filter: combine(self.conditions),
            })
            .await
    }
}
