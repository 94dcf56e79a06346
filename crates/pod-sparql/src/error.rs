use thiserror::Error;

/// Translation failures.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Query misuse detected while rendering
    #[error(transparent)]
    Domain(#[from] pod_domain::DomainError),

    /// A value could not be formatted as an RDF literal
    #[error("cannot format value for column `{column}`: {reason}")]
    UnsupportedValue { column: String, reason: String },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, TranslateError>;
