use crate::{
    error::Result,
    session::{FetchRequest, Session},
};

const LDP_BASIC_CONTAINER: &str = "<http://www.w3.org/ns/ldp#BasicContainer>; rel=\"type\"";

/// Make sure the container exists, creating it as an LDP BasicContainer if
/// the Pod answers 404. A 409 on the PUT means someone else created it
/// first, which is fine.
pub(crate) async fn ensure_container(session: &dyn Session, container_url: &str) -> Result<()> {
    let head = session.fetch(FetchRequest::head(container_url)).await?;
    if head.is_success() || head.status == 401 || head.status == 403 {
        return Ok(());
    }
    if head.status != 404 && head.status != 405 {
        return Err(head.into_transport_error());
    }

    let put = session
        .fetch(
            FetchRequest::put(container_url)
                .header("Content-Type", "text/turtle")
                .header("Link", LDP_BASIC_CONTAINER)
                .body(""),
        )
        .await?;
    if put.is_success() || put.status == 409 {
        tracing::info!(container = %container_url, "Created Pod container");
        Ok(())
    } else {
        Err(put.into_transport_error())
    }
}

/// Existence check for the table resource.
///
/// 405 on HEAD falls back to a GET; 401/403 count as existing so the real
/// authorization failure surfaces on the data request instead of here.
pub(crate) async fn resource_exists(session: &dyn Session, resource_url: &str) -> Result<bool> {
    let head = session.fetch(FetchRequest::head(resource_url)).await?;
    match head.status {
        status if (200..300).contains(&status) => Ok(true),
        401 | 403 => Ok(true),
        404 => Ok(false),
        405 => {
            let get = session
                .fetch(FetchRequest::get(resource_url).header("Accept", "text/turtle"))
                .await?;
            match get.status {
                status if (200..300).contains(&status) => Ok(true),
                404 => Ok(false),
                _ => Err(get.into_transport_error()),
            }
        }
        _ => Err(head.into_transport_error()),
    }
}

/// Create the resource as an empty Turtle document if it is missing.
pub(crate) async fn ensure_resource(session: &dyn Session, resource_url: &str) -> Result<()> {
    if resource_exists(session, resource_url).await? {
        return Ok(());
    }
    let put = session
        .fetch(
            FetchRequest::put(resource_url)
                .header("Content-Type", "text/turtle")
                .body(""),
        )
        .await?;
    if put.is_success() || put.status == 409 {
        tracing::debug!(resource = %resource_url, "Created empty table resource");
        Ok(())
    } else {
        Err(put.into_transport_error())
    }
}
