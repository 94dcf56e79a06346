use thiserror::Error;

/// Errors caused by misusing the query API.
///
/// These are raised from builders and the translator before any HTTP
/// traffic happens, never from the remote Pod.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Limit must be a non-negative integer
    #[error("limit must be a non-negative integer, got {0}")]
    InvalidLimit(i64),

    /// Offset must be a non-negative integer
    #[error("offset must be a non-negative integer, got {0}")]
    InvalidOffset(i64),

    /// Select builder executed without a primary table
    #[error("select requires a primary table; call from() first")]
    MissingTable,

    /// Join registered with an empty condition map
    #[error("join on table `{0}` has no conditions")]
    EmptyJoinCondition(String),

    /// Each join condition must reference the joined alias on exactly one side
    #[error("join condition `{left} = {right}` must reference alias `{alias}` on exactly one side")]
    JoinConditionScope {
        left: String,
        right: String,
        alias: String,
    },

    /// Two rows of one insert batch share the same id
    #[error("duplicate id `{0}` in insert batch")]
    DuplicateId(String),

    /// Mixed select-list without a matching GROUP BY entry
    #[error("column `{0}` must appear in GROUP BY or be wrapped in an aggregate")]
    UngroupedColumn(String),

    /// Update executed without a where clause
    #[error("update requires a where clause")]
    UpdateWithoutFilter,

    /// A value row or condition referenced a column the table does not declare
    #[error("table `{table}` has no column `{column}`")]
    UnknownColumn { table: String, column: String },

    /// A table may declare at most one primary key
    #[error("table `{0}` declares more than one primary key")]
    MultiplePrimaryKeys(String),

    /// The RDF class binding must be an absolute IRI
    #[error("rdf class `{0}` is not an absolute IRI")]
    RelativeClassIri(String),

    /// The webId could not be split into a pod base and user path
    #[error("webId `{0}` is not an absolute URL")]
    InvalidWebId(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, DomainError>;
