//! Settings and setup errors.

use std::path::PathBuf;

/// Errors raised while loading settings or building the shared configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A configuration source could not be read or deserialized.
    #[error("config error: {0}")]
    Source(#[from] config::ConfigError),

    /// An explicitly requested settings file does not exist.
    #[error("settings file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// A required setting is absent or empty.
    #[error("{0} is required")]
    Missing(&'static str),

    /// The endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint {
        /// The configured endpoint.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Some other setting has an unusable value.
    #[error("invalid setting: {0}")]
    Invalid(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl SettingsError {
    #[must_use]
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}
