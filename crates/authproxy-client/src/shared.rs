//! Read-only configuration shared by every reconciler.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::credentials::Credentials;
use crate::error::SettingsError;
use crate::settings::ProviderSettings;
use crate::transport::{HttpTransport, Transport};

/// Endpoint, credentials and the transport handle, built once at setup.
///
/// Never mutated after construction; hand it out as `Arc<SharedConfig>` and
/// read it from any number of concurrent operations.
pub struct SharedConfig {
    endpoint: Url,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
}

impl SharedConfig {
    /// Validates `settings` and builds the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid settings or if the HTTP client cannot be
    /// built.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let endpoint = settings.endpoint_url()?;
        let credentials = settings.credentials();
        let transport = HttpTransport::new(
            endpoint.clone(),
            credentials.clone(),
            settings.request_timeout(),
        )?;
        tracing::debug!(%endpoint, username = %credentials.username, "configured admin API client");
        Ok(Self {
            endpoint,
            credentials,
            transport: Arc::new(transport),
        })
    }

    /// Uses an already-built transport (fakes in tests, custom clients).
    #[must_use]
    pub fn with_transport(
        endpoint: Url,
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            endpoint,
            credentials,
            transport,
        }
    }

    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.credentials.username
    }


    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

impl fmt::Debug for SharedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
