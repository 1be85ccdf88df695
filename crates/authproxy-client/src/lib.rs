//! # authproxy-client
//!
//! Transport and shared configuration for the AuthProxy admin API.
//!
//! - [`Transport`]: one authenticated request/response exchange, with
//!   [`HttpTransport`] as the reqwest-backed implementation
//! - [`ProviderSettings`] and [`load_settings`]: endpoint and credentials from
//!   file, environment and overrides
//! - [`SharedConfig`]: the immutable handle every reconciler is built with
//!
//! ```ignore
//! use authproxy_client::{load_settings, SettingsOverrides, SharedConfig};
//!
//! let settings = load_settings(None, &SettingsOverrides::default())?;
//! let shared = SharedConfig::from_settings(&settings)?.into_shared();
//! ```

mod credentials;
mod error;
pub mod settings;
mod shared;
pub mod transport;

pub use credentials::Credentials;
pub use error::SettingsError;
pub use settings::{LoggingSettings, ProviderSettings, SettingsOverrides, load_settings};
pub use shared::SharedConfig;
pub use transport::{Exchange, HttpTransport, Transport};

pub use tokio_util::sync::CancellationToken;
