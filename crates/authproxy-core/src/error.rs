//! Error types for remote reconciliation.
//!
//! Every failure an operation can hit is one of these variants. They are never
//! swallowed: reconcilers turn them into [`Diagnostic`](crate::Diagnostic)
//! records attached to the operation result.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur while talking to the admin API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// The request could not be built (malformed URL or unserializable body).
    #[error("Request build error: {message}")]
    RequestBuild {
        /// Description of what could not be built.
        message: String,
    },

    /// The exchange failed at the network level (connection, timeout, protocol).
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The remote answered with a status other than 200.
    #[error("Remote rejected request with status {status}: {body}")]
    RemoteRejected {
        /// HTTP status code returned by the remote.
        status: u16,
        /// Raw response body, kept for diagnostics only.
        body: String,
    },

    /// The response body did not match the expected schema.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    /// The calling context cancelled the operation while it was in flight.
    #[error("Operation cancelled")]
    Cancelled,

    /// The descriptor lacks the fields needed to address the remote entity.
    #[error("Invalid descriptor: {message}")]
    InvalidDescriptor {
        /// Which field is missing or malformed.
        message: String,
    },
}

impl ReconcileError {
    /// Creates a new `RequestBuild` error.
    #[must_use]
    pub fn request_build(message: impl Into<String>) -> Self {
        Self::RequestBuild {
            message: message.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a new `RemoteRejected` error.
    #[must_use]
    pub fn remote_rejected(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteRejected {
            status,
            body: body.into(),
        }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidDescriptor` error.
    #[must_use]
    pub fn invalid_descriptor(message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            message: message.into(),
        }
    }

    /// Returns `true` if the remote answered with a non-200 status.
    #[must_use]
    pub fn is_remote_rejected(&self) -> bool {
        matches!(self, Self::RemoteRejected { .. })
    }

    /// Returns `true` if the remote answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RemoteRejected { status: 404, .. })
    }

    /// Returns `true` if the operation was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the kind of this error for diagnostics and logging.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RequestBuild { .. } => ErrorKind::RequestBuild,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::RemoteRejected { .. } => ErrorKind::RemoteRejected,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::InvalidDescriptor { .. } => ErrorKind::InvalidDescriptor,
        }
    }
}

/// Kinds of reconcile errors, attached to diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Request could not be constructed.
    RequestBuild,
    /// Network-level failure.
    Transport,
    /// Non-200 status from the remote.
    RemoteRejected,
    /// Response body did not match the schema.
    Decode,
    /// Cancelled by the caller.
    Cancelled,
    /// Descriptor cannot address an entity.
    InvalidDescriptor,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestBuild => write!(f, "request_build"),
            Self::Transport => write!(f, "transport"),
            Self::RemoteRejected => write!(f, "remote_rejected"),
            Self::Decode => write!(f, "decode"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::InvalidDescriptor => write!(f, "invalid_descriptor"),
        }
    }
}
