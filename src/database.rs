use std::future::Future;
use std::sync::Arc;

use pod_domain::{PodLocation, Table};
use pod_store::{OxigraphEngine, PodStore, Result, Session, SparqlEngine, StoreConfig, StoreError};
use tracing::Instrument;

use crate::builder::{DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};

/// Entry point binding one session to the Pod derived from its webId.
///
/// Cloning is cheap; clones share the executor, its prefix registry, and
/// the engine cache.
#[derive(Clone)]
pub struct Database {
    store: Arc<PodStore>,
}

impl Database {
    /// Bind to a session with the default engine and configuration.
    ///
    /// Fails when the session is not logged in or carries no webId.
    pub fn new(session: Arc<dyn Session>) -> Result<Self> {
        Self::with_config(session, StoreConfig::default())
    }

    pub fn with_config(session: Arc<dyn Session>, config: StoreConfig) -> Result<Self> {
        let engine = Arc::new(
            OxigraphEngine::new(config.cache_ttl())
                .with_query_timeout(config.timeouts.query_timeout()),
        );
        Self::with_engine(session, engine, config)
    }

    /// Bind with an explicit engine, for swapping in another SPARQL
    /// implementation.
    pub fn with_engine(
        session: Arc<dyn Session>,
        engine: Arc<dyn SparqlEngine>,
        config: StoreConfig,
    ) -> Result<Self> {
        let info = session.info();
        if !info.is_logged_in {
            return Err(StoreError::NotLoggedIn);
        }
        let web_id = info.web_id.clone().ok_or(StoreError::NotLoggedIn)?;
        let location = PodLocation::from_web_id(&web_id)?;
        tracing::debug!(pod = %location.pod_base(), user = %location.user_path(), "Database bound to Pod");

        Ok(Self {
            store: Arc::new(PodStore::new(session, engine, location, config)),
        })
    }

    /// Location derived from the session's webId.
    pub fn location(&self) -> &PodLocation {
        self.store.location()
    }

    /// Register a SPARQL prefix for all subsequent operations.
    pub fn add_prefix(&self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.store.add_prefix(prefix, uri);
    }

    /// Start a select over all columns; narrow with
    /// [`SelectBuilder::fields`].
    pub fn select(&self) -> SelectBuilder {
        SelectBuilder::new(self.store.clone())
    }

    /// Start an insert of one or more rows into the table.
    pub fn insert(&self, table: &Table) -> InsertBuilder {
        InsertBuilder::new(self.store.clone(), table.clone())
    }

    /// Start an update against the table.
    pub fn update(&self, table: &Table) -> UpdateBuilder {
        UpdateBuilder::new(self.store.clone(), table.clone())
    }

    /// Start a delete against the table.
    pub fn delete(&self, table: &Table) -> DeleteBuilder {
        DeleteBuilder::new(self.store.clone(), table.clone())
    }

    /// Run grouped work against the same session.
    ///
    /// Purely sequential, no isolation: statements inside the closure hit
    /// the Pod as they execute, and a failure does not undo earlier ones.
    /// The wrapper exists for structured error handling and log
    /// attribution.
    pub async fn transaction<T, Fut, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(Database) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let span = tracing::info_span!("pod_transaction");
        work(self.clone()).instrument(span).await
    }
}
