use std::time::Duration;

use crate::{
    config::ConflictRetryPolicy,
    engine::SparqlEngine,
    error::Result,
    session::{FetchRequest, FetchResponse, Method, Session},
};

const SPARQL_UPDATE: &str = "application/sparql-update";

/// Ship a SPARQL update to the resource.
///
/// PATCH first; a 409 walks the retry ladder (replay the PATCH, then PUT
/// the same body) as far as the policy allows. Any 2xx along the way wins
/// and invalidates the engine cache for the URL. Retries send the original
/// body unchanged; this copes with lost-update responses but is not
/// optimistic concurrency.
pub(crate) async fn apply_sparql_update(
    session: &dyn Session,
    engine: &dyn SparqlEngine,
    policy: &ConflictRetryPolicy,
    resource_url: &str,
    update: &str,
    timeout: Duration,
) -> Result<u16> {
    let request = |method: Method| {
        FetchRequest::new(method, resource_url)
            .header("Content-Type", SPARQL_UPDATE)
            .body(update)
            .timeout(timeout)
    };

    let mut response = session.fetch(request(Method::Patch)).await?;
    if response.status == 409 {
        if policy.replay_patch {
            tracing::warn!(resource = %resource_url, "Conflict on SPARQL PATCH, replaying");
            response = session.fetch(request(Method::Patch)).await?;
        }
        if !response.is_success() && policy.put_fallback {
            tracing::warn!(resource = %resource_url, "Conflict persists, retrying as PUT");
            response = session.fetch(request(Method::Put)).await?;
        }
    }

    finish(engine, resource_url, response)
}

fn finish(engine: &dyn SparqlEngine, resource_url: &str, response: FetchResponse) -> Result<u16> {
    if response.is_success() {
        engine.invalidate(resource_url);
        Ok(response.status)
    } else {
        Err(response.into_transport_error())
    }
}
