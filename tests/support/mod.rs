//! In-memory Pod used by the integration suite: a `Session` over a map of
//! Turtle documents that honors the HEAD/GET/PUT/PATCH dialogue, including
//! `application/sparql-update` bodies applied through oxigraph.

// Each test binary uses a different slice of this module
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::store::Store;
use pod_query::{
    Column, Database, FetchRequest, FetchResponse, Method, Result, Session, SessionInfo, Table,
};

pub const WEB_ID: &str = "https://pod.example/alice/profile/card#me";

const SPARQL_UPDATE: &str = "application/sparql-update";

pub struct MemoryPodSession {
    info: SessionInfo,
    resources: DashMap<String, String>,
    containers: DashMap<String, ()>,
    conflicts_to_inject: AtomicUsize,
    pub patch_count: AtomicUsize,
    pub request_count: AtomicUsize,
}

impl MemoryPodSession {
    pub fn new() -> Self {
        Self {
            info: SessionInfo {
                web_id: Some(WEB_ID.to_string()),
                is_logged_in: true,
            },
            resources: DashMap::new(),
            containers: DashMap::new(),
            conflicts_to_inject: AtomicUsize::new(0),
            patch_count: AtomicUsize::new(0),
            request_count: AtomicUsize::new(0),
        }
    }

    pub fn logged_out() -> Self {
        let mut session = Self::new();
        session.info.is_logged_in = false;
        session
    }

    /// Answer the next `n` PATCH requests with 409.
    pub fn inject_conflicts(&self, n: usize) {
        self.conflicts_to_inject.store(n, Ordering::SeqCst);
    }

    pub fn requests(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn respond(status: u16, body: impl Into<String>) -> FetchResponse {
        FetchResponse {
            status,
            status_text: match status {
                200 => "OK",
                201 => "Created",
                400 => "Bad Request",
                404 => "Not Found",
                405 => "Method Not Allowed",
                409 => "Conflict",
                _ => "Unknown",
            }
            .to_string(),
            body: body.into(),
        }
    }

    fn apply_sparql_update(
        existing: &str,
        base: &str,
        update: &str,
    ) -> std::result::Result<String, String> {
        let store = Store::new().map_err(|e| e.to_string())?;
        if !existing.trim().is_empty() {
            let parser = RdfParser::from_format(RdfFormat::Turtle)
                .with_base_iri(base)
                .map_err(|e| e.to_string())?
                .lenient();
            for parsed in parser.for_reader(existing.as_bytes()) {
                let quad = parsed.map_err(|e| e.to_string())?;
                store.insert(quad.as_ref()).map_err(|e| e.to_string())?;
            }
        }
        store.update(update).map_err(|e| e.to_string())?;

        let mut serializer = RdfSerializer::from_format(RdfFormat::NTriples).for_writer(Vec::new());
        for quad in store.iter() {
            let quad = quad.map_err(|e| e.to_string())?;
            serializer.serialize_quad(&quad).map_err(|e| e.to_string())?;
        }
        let bytes = serializer.finish().map_err(|e| e.to_string())?;
        String::from_utf8(bytes).map_err(|e| e.to_string())
    }

    fn handle_write_body(&self, url: &str, body: &str) -> FetchResponse {
        // Drop the map ref before writing back to the same shard
        let existing = self
            .resources
            .get(url)
            .map(|r| r.value().clone())
            .unwrap_or_default();
        match Self::apply_sparql_update(&existing, url, body) {
            Ok(updated) => {
                self.resources.insert(url.to_string(), updated);
                Self::respond(200, "")
            }
            Err(reason) => Self::respond(400, reason),
        }
    }
}

fn header<'a>(request: &'a FetchRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[async_trait]
impl Session for MemoryPodSession {
    fn info(&self) -> &SessionInfo {
        &self.info
    }

    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        let url = request.url.clone();
        Ok(match request.method {
            Method::Head => {
                if self.resources.contains_key(&url) || self.containers.contains_key(&url) {
                    Self::respond(200, "")
                } else {
                    Self::respond(404, "")
                }
            }
            Method::Get => match self.resources.get(&url) {
                Some(body) => Self::respond(200, body.value().clone()),
                None if self.containers.contains_key(&url) => Self::respond(200, ""),
                None => Self::respond(404, ""),
            },
            Method::Put => {
                let link = header(&request, "Link").unwrap_or_default();
                if link.contains("BasicContainer") {
                    self.containers.insert(url, ());
                    Self::respond(201, "")
                } else if header(&request, "Content-Type") == Some(SPARQL_UPDATE) {
                    // PUT leg of the conflict retry ladder
                    self.handle_write_body(&url, request.body.as_deref().unwrap_or(""))
                } else {
                    self.resources
                        .insert(url, request.body.unwrap_or_default());
                    Self::respond(201, "")
                }
            }
            Method::Patch => {
                self.patch_count.fetch_add(1, Ordering::SeqCst);
                let pending = self.conflicts_to_inject.load(Ordering::SeqCst);
                if pending > 0 {
                    self.conflicts_to_inject.store(pending - 1, Ordering::SeqCst);
                    return Ok(Self::respond(409, "conflict"));
                }
                if header(&request, "Content-Type") != Some(SPARQL_UPDATE) {
                    return Ok(Self::respond(405, ""));
                }
                self.handle_write_body(&url, request.body.as_deref().unwrap_or(""))
            }
            Method::Delete => {
                if self.resources.remove(&url).is_some() {
                    Self::respond(200, "")
                } else {
                    Self::respond(404, "")
                }
            }
            Method::Post => Self::respond(405, ""),
        })
    }
}

/// Opt-in log visibility for test runs, driven by `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Database over a fresh in-memory Pod; also hands back the session for
/// traffic assertions and fault injection.
pub fn database() -> (Database, Arc<MemoryPodSession>) {
    init_logging();
    let session = Arc::new(MemoryPodSession::new());
    let db = Database::new(session.clone()).expect("session is logged in");
    (db, session)
}

/// `profiles(id PK, name NOT NULL, age, createdAt NOT NULL)`
pub fn profiles(container: &str) -> Table {
    Table::build(
        "profiles",
        format!("/drizzle-tests/{container}/"),
        "http://schema.org/Person",
    )
    .column(Column::string("id").primary_key())
    .column(Column::string("name").required())
    .column(Column::integer("age"))
    .column(Column::datetime("createdAt").required())
    .finish()
    .expect("valid table")
}

pub fn users(container: &str) -> Table {
    Table::build(
        "users",
        format!("/drizzle-tests/{container}/"),
        "http://schema.org/Person",
    )
    .column(Column::string("id").primary_key())
    .column(Column::string("name").required())
    .finish()
    .expect("valid table")
}

pub fn posts(container: &str) -> Table {
    Table::build(
        "posts",
        format!("/drizzle-tests/{container}/"),
        "http://schema.org/Article",
    )
    .column(Column::string("id").primary_key())
    .column(Column::string("title").required())
    .column(Column::string("authorId").required())
    .finish()
    .expect("valid table")
}
