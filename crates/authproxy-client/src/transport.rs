//! Authenticated request/response exchange with the admin API.
//!
//! [`Transport`] is the seam reconcilers are written against. The production
//! implementation is [`HttpTransport`]; tests inject in-memory fakes.

use std::time::Duration;

use async_trait::async_trait;
use authproxy_core::{Method, ReconcileError, RemoteCall};
use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::credentials::Credentials;
use crate::error::SettingsError;

/// Outcome of one completed HTTP exchange.
///
/// Any status counts as a completed exchange; interpreting it is up to the
/// caller. `body` is an error when the headers arrived but the body could not
/// be drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub status: u16,
    pub body: Result<Vec<u8>, String>,
}

impl Exchange {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: Ok(body.into()),
        }
    }

    /// The admin API signals success with exactly 200.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Body as text for logging, empty if it could not be read.
    #[must_use]
    pub fn body_text(&self) -> String {
        match &self.body {
            Ok(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Err(_) => String::new(),
        }
    }
}

/// Issues a single request against the admin API.
///
/// Implementations must be thread-safe (`Send + Sync`): one transport is
/// shared by every concurrent operation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes `call` and returns the exchange.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::RequestBuild` if the request cannot be built,
    /// `ReconcileError::Transport` if the exchange fails on the network, and
    /// `ReconcileError::Cancelled` if `cancel` fires first. A non-200 status is
    /// *not* an error here.
    async fn execute(
        &self,
        call: &RemoteCall,
        cancel: &CancellationToken,
    ) -> Result<Exchange, ReconcileError>;
}

/// reqwest-backed transport using HTTP Basic auth.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
    credentials: Credentials,
}

impl HttpTransport {
    /// Builds a transport with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::HttpClient` if the client cannot be built.
    pub fn new(
        endpoint: Url,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, SettingsError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("authproxy-reconciler/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SettingsError::HttpClient(e.to_string()))?;
        Ok(Self::with_http_client(endpoint, credentials, http))
    }

    /// Builds a transport around an existing client.
    #[must_use]
    pub fn with_http_client(endpoint: Url, credentials: Credentials, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint,
            credentials,
        }
    }


    /// Joins the call's segments onto the endpoint, percent-encoding each.
    fn url_for(&self, call: &RemoteCall) -> Result<Url, ReconcileError> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ReconcileError::request_build(format!(
                    "endpoint {} cannot carry a path",
                    self.endpoint
                ))
            })?;
            segments.pop_if_empty().extend(&call.segments);
        }
        Ok(url)
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        call: &RemoteCall,
        cancel: &CancellationToken,
    ) -> Result<Exchange, ReconcileError> {
        let url = self.url_for(call)?;
        let mut builder = self
            .http
            .request(to_reqwest_method(call.method), url)
            .header(ACCEPT, "application/json");
        if let Some(body) = &call.body {
            builder = builder.json(body);
        }

        tracing::debug!("Setting basic auth");
        let request = builder
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .build()
            .map_err(|e| ReconcileError::request_build(e.to_string()))?;

        tracing::debug!(method = %call.method, path = %call.path(), "Making request");
        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ReconcileError::Cancelled),
            res = self.http.execute(request) => res.map_err(|e| {
                tracing::warn!(method = %call.method, path = %call.path(), "request failed: {}", e);
                ReconcileError::transport(e.to_string())
            })?,
        };

        let status = response.status().as_u16();
        // Drain the body whatever the status; a read failure is kept, not raised.
        let body = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ReconcileError::Cancelled),
            bytes = response.bytes() => bytes.map(|b| b.to_vec()).map_err(|e| e.to_string()),
        };
        tracing::trace!(status, "exchange complete");

        Ok(Exchange { status, body })
    }
}
