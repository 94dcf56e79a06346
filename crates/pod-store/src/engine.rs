use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Term as OxTerm;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::{
    error::{Result, StoreError},
    session::{FetchRequest, Session},
};

/// One bound RDF term as handed to the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub value: String,
    pub kind: TermKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    Iri,
    BlankNode,
    Literal {
        datatype: Option<String>,
        language: Option<String>,
    },
}

/// One solution row: variable name → term.
pub type BindingSet = HashMap<String, Term>;

/// Executes SPARQL text against a named resource URL.
///
/// The engine and the HTTP transport are the two seams of the core; both
/// can be swapped without touching the executor.
#[async_trait]
pub trait SparqlEngine: Send + Sync {
    /// Evaluate a SELECT and return its solution sequence in order.
    async fn query_bindings(
        &self,
        query: &str,
        source: &str,
        session: &dyn Session,
    ) -> Result<Vec<BindingSet>>;

    /// Evaluate an ASK.
    async fn query_boolean(&self, query: &str, source: &str, session: &dyn Session)
        -> Result<bool>;

    /// Drop any cached state for the resource; called after every
    /// successful write to its URL.
    fn invalidate(&self, url: &str);
}

struct CachedDocument {
    fetched_at: Instant,
    body: String,
}

/// Default engine: fetches the Turtle document through the session and
/// evaluates queries locally in an in-memory oxigraph store.
///
/// Keeps a per-resource response cache so a flight of reads against the
/// same resource costs one round-trip; the cache is a pure optimization
/// and is invalidated on every write.
pub struct OxigraphEngine {
    cache: DashMap<String, CachedDocument>,
    ttl: Duration,
    query_timeout: Option<Duration>,
    /// Extra sources registered for federated reads; reserved
    extra_sources: RwLock<Vec<String>>,
}

impl OxigraphEngine {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: DashMap::new(),
            ttl,
            query_timeout: None,
            extra_sources: RwLock::new(Vec::new()),
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Register an additional data source for future federated reads.
    pub fn register_source(&self, url: impl Into<String>) {
        self.extra_sources
            .write()
            .expect("source registry lock poisoned")
            .push(url.into());
    }

    /// Sources registered beyond the webId-derived Pod.
    pub fn sources(&self) -> Vec<String> {
        self.extra_sources
            .read()
            .expect("source registry lock poisoned")
            .clone()
    }

    async fn fetch_document(&self, url: &str, session: &dyn Session) -> Result<String> {
        if let Some(cached) = self.cache.get(url) {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(cached.body.clone());
            }
        }

        let mut request = FetchRequest::get(url).header("Accept", "text/turtle");
        if let Some(timeout) = self.query_timeout {
            request = request.timeout(timeout);
        }
        let response = session.fetch(request).await?;

        let body = if response.status == 404 {
            // A resource that was never created reads as empty
            String::new()
        } else if response.is_success() {
            response.body
        } else {
            return Err(response.into_transport_error());
        };

        self.cache.insert(
            url.to_string(),
            CachedDocument {
                fetched_at: Instant::now(),
                body: body.clone(),
            },
        );
        Ok(body)
    }

    fn load_store(&self, body: &str, base_iri: &str) -> Result<Store> {
        let store = Store::new().map_err(|e| StoreError::Sparql {
            reason: e.to_string(),
        })?;
        if !body.trim().is_empty() {
            let parser = RdfParser::from_format(RdfFormat::Turtle)
                .with_base_iri(base_iri)
                .map_err(|e| StoreError::Parse {
                    reason: e.to_string(),
                })?
                .lenient();
            for parsed in parser.for_reader(body.as_bytes()) {
                let quad = parsed.map_err(|e| StoreError::Parse {
                    reason: e.to_string(),
                })?;
                store.insert(quad.as_ref()).map_err(|e| StoreError::Sparql {
                    reason: e.to_string(),
                })?;
            }
        }
        Ok(store)
    }

    async fn evaluate(
        &self,
        query: &str,
        source: &str,
        session: &dyn Session,
    ) -> Result<QueryResults> {
        let body = self.fetch_document(source, session).await?;
        let store = self.load_store(&body, source)?;
        store.query(query).map_err(|e| StoreError::Sparql {
            reason: e.to_string(),
        })
    }
}

fn convert_term(term: &OxTerm) -> Term {
    match term {
        OxTerm::NamedNode(node) => Term {
            value: node.as_str().to_string(),
            kind: TermKind::Iri,
        },
        OxTerm::BlankNode(node) => Term {
            value: node.as_str().to_string(),
            kind: TermKind::BlankNode,
        },
        OxTerm::Literal(literal) => Term {
            value: literal.value().to_string(),
            kind: TermKind::Literal {
                datatype: Some(literal.datatype().as_str().to_string()),
                language: literal.language().map(str::to_string),
            },
        },
        OxTerm::Triple(triple) => Term {
            value: triple.to_string(),
            kind: TermKind::BlankNode,
        },
    }
}

#[async_trait]
impl SparqlEngine for OxigraphEngine {
    async fn query_bindings(
        &self,
        query: &str,
        source: &str,
        session: &dyn Session,
    ) -> Result<Vec<BindingSet>> {
        let results = self.evaluate(query, source, session).await?;
        let QueryResults::Solutions(solutions) = results else {
            return Err(StoreError::Sparql {
                reason: "expected a solution sequence".to_string(),
            });
        };

        let mut rows = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|e| StoreError::Sparql {
                reason: e.to_string(),
            })?;
            let mut row = BindingSet::new();
            for (variable, term) in solution.iter() {
                row.insert(variable.as_str().to_string(), convert_term(term));
            }
            rows.push(row);
        }
        Ok(rows)
    }

    async fn query_boolean(
        &self,
        query: &str,
        source: &str,
        session: &dyn Session,
    ) -> Result<bool> {
        match self.evaluate(query, source, session).await? {
            QueryResults::Boolean(value) => Ok(value),
            _ => Err(StoreError::Sparql {
                reason: "expected a boolean result".to_string(),
            }),
        }
    }

    fn invalidate(&self, url: &str) {
        self.cache.remove(url);
    }
}
