//! Compilation of pod-query operations into SPARQL 1.1 text.
//!
//! The translator is purely textual: it renders prefixed statements from
//! the operation IR and never talks to the network itself.

mod error;
mod filter;
mod literal;
mod mutation;
mod prefixes;
mod select;

use std::sync::RwLock;

use pod_domain::{Condition, InsertOp, PodLocation, SelectOp, Table, ValueRow};

pub use error::{Result, TranslateError};
pub use filter::{like_to_regex, var_name};
pub use literal::{XSD_BOOLEAN, XSD_DATETIME, XSD_JSON, escape_string};
pub use mutation::InsertStatement;
pub use prefixes::{FIXED_PREFIXES, PrefixRegistry};

/// Stateful SPARQL renderer.
///
/// The only state is the prefix registry; user-registered prefixes take
/// effect for every statement compiled afterwards.
#[derive(Debug, Default)]
pub struct SparqlTranslator {
    prefixes: RwLock<PrefixRegistry>,
}

impl SparqlTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prefix for subsequent compilations.
    pub fn add_prefix(&self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.prefixes
            .write()
            .expect("prefix registry lock poisoned")
            .add(prefix, uri);
    }

    fn header(&self) -> String {
        self.prefixes
            .read()
            .expect("prefix registry lock poisoned")
            .header()
    }

    /// Compile a select over one resource.
    pub fn select(&self, op: &SelectOp, location: &PodLocation) -> Result<String> {
        select::render_select(&self.header(), op, location)
    }

    /// Compile the subject-discovery select used by conditional updates and
    /// deletes.
    pub fn subject_select(
        &self,
        table: &Table,
        filter: Option<&Condition>,
        location: &PodLocation,
    ) -> Result<String> {
        select::render_subject_select(&self.header(), table, filter, location)
    }

    /// Compile an insert batch into one `INSERT DATA` statement.
    pub fn insert(&self, op: &InsertOp, location: &PodLocation) -> Result<InsertStatement> {
        mutation::render_insert(&self.header(), op, location)
    }

    /// Compile the per-subject update statement.
    pub fn update_subject(
        &self,
        table: &Table,
        changes: &ValueRow,
        subject: &str,
    ) -> Result<String> {
        mutation::render_update_subject(&self.header(), table, changes, subject)
    }

    /// Compile a single-subject delete.
    pub fn delete_subject(&self, subject: &str) -> String {
        mutation::render_delete_subject(&self.header(), subject)
    }

    /// Compile a whole-class delete.
    pub fn delete_class(&self, table: &Table) -> String {
        mutation::render_delete_class(&self.header(), table)
    }
}
