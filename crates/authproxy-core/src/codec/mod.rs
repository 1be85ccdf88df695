//! Wire codec for the admin API.
//!
//! Each entity kind gets a module that turns descriptors into [`RemoteCall`]s
//! and decodes success bodies back into descriptors. Nothing here performs
//! I/O, so request construction is testable on its own.

pub mod role;
pub mod tenant;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ReconcileError;

/// HTTP methods used by the admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request against the admin API, relative to the configured endpoint.
///
/// The path is kept as raw segments; the transport percent-encodes them when
/// joining onto the endpoint URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCall {
    pub method: Method,
    pub segments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RemoteCall {
    #[must_use]
    pub fn new<S: Into<String>>(method: Method, segments: impl IntoIterator<Item = S>) -> Self {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            body: None,
        }
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::RequestBuild` if `body` cannot be serialized.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, ReconcileError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ReconcileError::request_build(format!("unserializable body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Human-readable path, e.g. `/tenants/acme/roles/admin`.
    #[must_use]
    pub fn path(&self) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            path.push_str(segment);
        }
        path
    }
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path())
    }
}

/// Response carrying only the remote-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

/// Decodes a success body.
///
/// # Errors
///
/// Returns `ReconcileError::Decode` when the body is not valid JSON for `T`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ReconcileError> {
    serde_json::from_slice(body).map_err(|e| ReconcileError::decode(e.to_string()))
}

pub(crate) fn require_key(value: &str, what: &str) -> Result<(), ReconcileError> {
    if value.is_empty() {
        Err(ReconcileError::invalid_descriptor(format!("{what} is empty")))
    } else {
        Ok(())
    }
}
