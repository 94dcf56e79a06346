use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Result, StoreError};

/// Identity attached to a session.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub web_id: Option<String>,
    pub is_logged_in: bool,
}

/// HTTP verbs the executor issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Head,
    Get,
    Put,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Head => "HEAD",
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// One outgoing request. Built with the verb helpers below.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

impl FetchRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::Head, url)
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::Patch, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// One incoming response, body already read.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Convert a failure response into the transport error shape.
    pub fn into_transport_error(self) -> StoreError {
        StoreError::Transport {
            status: self.status,
            status_text: self.status_text,
            body: self.body,
        }
    }
}

/// Authenticated HTTP access to the Pod.
///
/// The executor never talks to the network directly; every request goes
/// through the session so authentication stays transparent to the core.
#[async_trait]
pub trait Session: Send + Sync {
    fn info(&self) -> &SessionInfo;

    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse>;
}

/// Plain reqwest-backed session.
///
/// Suitable for public Pods or servers behind a static bearer token; OIDC
/// flows live outside the core and plug in through the [`Session`] trait.
pub struct ReqwestSession {
    client: Client,
    info: SessionInfo,
    bearer_token: Option<String>,
}

impl ReqwestSession {
    pub fn new(web_id: impl Into<String>) -> Result<Self> {
        Self::with_token(web_id, None)
    }

    pub fn with_token(web_id: impl Into<String>, bearer_token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            // Connection pooling: keep up to 10 idle connections per host
            .pool_max_idle_per_host(10)
            // Close idle connections after 30 seconds
            .pool_idle_timeout(Duration::from_secs(30))
            // TCP keepalive to detect dead connections
            .tcp_keepalive(Duration::from_secs(60))
            // Timeout for establishing new connections
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            info: SessionInfo {
                web_id: Some(web_id.into()),
                is_logged_in: true,
            },
            bearer_token,
        })
    }
}

#[async_trait]
impl Session for ReqwestSession {
    fn info(&self) -> &SessionInfo {
        &self.info
    }

    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .expect("verb set is fixed");
        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(FetchResponse {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            body,
        })
    }
}
