//! Value types of the pod-query layer: schema model, condition algebra,
//! aggregates, the operation IR, and Pod location derivation.
//!
//! Everything here is plain data with construction-time validation; the
//! translation to SPARQL and the execution against a Pod live in the
//! `pod-sparql` and `pod-store` crates.

pub mod aggregate;
mod column;
pub mod condition;
pub mod error;
mod location;
mod operation;
pub mod row;
mod table;
mod value;
pub mod vocab;

pub use column::{Column, ColumnType};
pub use condition::{ColumnRef, CompareOp, Condition, FieldValue};
pub use error::{DomainError, Result};
pub use location::PodLocation;
pub use operation::{
    DeleteOp, InsertOp, JoinClause, JoinCondition, JoinKind, OrderKey, SelectField, SelectOp,
    SortDirection, UpdateOp, ValueRow,
};
pub use row::Row;
pub use table::{Namespace, Table, TableBuilder};
pub use value::Value;
