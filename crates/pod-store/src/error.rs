use thiserror::Error;

/// Errors surfaced by the Pod executor.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database constructed from an unauthenticated session or one without
    /// a webId
    #[error("session is not logged in or carries no webId")]
    NotLoggedIn,

    /// Insert would clash with a subject already present in the resource
    #[error("subject `{subject}` already exists in `{resource}`")]
    ResourceExists { subject: String, resource: String },

    /// Update or delete preflight found no resource to operate on
    #[error("resource `{0}` does not exist")]
    NotFound(String),

    /// HTTP non-2xx after the prescribed retries, or network failure
    #[error("transport error (status {status} {status_text}): {body}")]
    Transport {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Engine failed to parse or execute a statement
    #[error("SPARQL error: {reason}")]
    Sparql { reason: String },

    /// Malformed RDF literal or unexpected datatype during normalization
    #[error("failed to parse response: {reason}")]
    Parse { reason: String },

    /// Query misuse detected at execute time
    #[error(transparent)]
    Domain(#[from] pod_domain::DomainError),

    /// HTTP client failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Concurrency limiter shut down
    #[error("semaphore closed")]
    SemaphoreClosed,
}

impl From<pod_sparql::TranslateError> for StoreError {
    fn from(err: pod_sparql::TranslateError) -> Self {
        match err {
            pod_sparql::TranslateError::Domain(domain) => StoreError::Domain(domain),
            other => StoreError::Sparql {
                reason: other.to_string(),
            },
        }
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;
