//! pod-query: a typed, SQL-flavored query layer over Solid Pods.
//!
//! Tables and columns describe how rows map onto RDF triples inside a
//! Pod's Turtle resources; fluent builders compose select/insert/update/
//! delete requests; the executor compiles them to SPARQL 1.1, ships them
//! over the session's authenticated HTTP transport, and falls back to an
//! in-process planner for joins, group-by, and aggregates.
//!
//! ```no_run
//! use std::sync::Arc;
//! use pod_query::{Column, Database, ReqwestSession, SortDirection, Table, Value};
//! use pod_query::condition::like;
//!
//! # async fn demo() -> pod_query::Result<()> {
//! let profiles = Table::build("profiles", "/app/data/", "http://schema.org/Person")
//!     .column(Column::string("id").primary_key())
//!     .column(Column::string("name").required())
//!     .column(Column::integer("age"))
//!     .finish()?;
//!
//! let session = Arc::new(ReqwestSession::new("https://pod.example/alice/card#me")?);
//! let db = Database::new(session)?;
//!
//! db.insert(&profiles)
//!     .values([("id", Value::from("p1")), ("name", "Alice".into()), ("age", 30.into())])
//!     .execute()
//!     .await?;
//!
//! let rows = db
//!     .select()
//!     .from(&profiles)
//!     .filter(like("name", "ali%"))
//!     .order_by("age", SortDirection::Asc)
//!     .execute()
//!     .await?;
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```

mod builder;
mod database;

pub use builder::{DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
pub use database::Database;

pub use pod_domain::{
    Column, ColumnRef, ColumnType, Condition, DomainError, FieldValue, JoinKind, Namespace,
    PodLocation, Row, SelectField, SortDirection, Table, TableBuilder, Value, ValueRow, aggregate,
    condition, row, vocab,
};
pub use pod_sparql::{PrefixRegistry, SparqlTranslator};
pub use pod_store::{
    BindingSet, ConflictRetryPolicy, FetchRequest, FetchResponse, Method, MutationOutcome,
    OxigraphEngine, PodStore, ReqwestSession, Result, Session, SessionInfo, SparqlEngine,
    StoreConfig, StoreError, Term, TermKind, TimeoutConfig,
};
