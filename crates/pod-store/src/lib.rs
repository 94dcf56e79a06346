//! Execution of pod-query operations against a remote Pod.
//!
//! The executor resolves resource locations, runs the container/resource
//! lifecycle, ships SPARQL over the session's HTTP transport, and falls
//! back to an in-process planner for joins, group-by, and aggregates.

mod config;
mod engine;
mod error;
mod normalize;
mod planner;
mod preflight;
mod results;
mod session;
mod store;
mod transport;

pub use config::{ConflictRetryPolicy, StoreConfig, TimeoutConfig};
pub use engine::{BindingSet, OxigraphEngine, SparqlEngine, Term, TermKind};
pub use error::{Result, StoreError};
pub use results::MutationOutcome;
pub use session::{FetchRequest, FetchResponse, Method, ReqwestSession, Session, SessionInfo};
pub use store::PodStore;
