use std::sync::Arc;

use pod_domain::{InsertOp, Table, Value, ValueRow};
use pod_store::{MutationOutcome, PodStore, Result};

/// Builder for inserts. Each `values` call appends one row; rows without
/// an id get a millisecond-timestamp id, so callers that need stable ids
/// should always provide one.
pub struct InsertBuilder {
    store: Arc<PodStore>,
    table: Table,
    rows: Vec<ValueRow>,
}

impl InsertBuilder {
    pub(crate) fn new(store: Arc<PodStore>, table: Table) -> Self {
        Self {
            store,
            table,
            rows: Vec::new(),
        }
    }

    /// Append one row. Call repeatedly for a batch.
    pub fn values<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let row = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.rows.push(row);
        self
    }

    /// Append a batch of prebuilt rows.
    pub fn rows(mut self, rows: impl IntoIterator<Item = ValueRow>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Run the insert. An empty batch resolves without HTTP traffic.
    pub async fn execute(self) -> Result<Vec<MutationOutcome>> {
        self.store
            .insert(InsertOp {
                table: self.table,
                rows: self.rows,
            })
            .await
    }
}
