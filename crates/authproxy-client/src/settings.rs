//! Provider settings: where the admin API lives and how to authenticate.
//!
//! Settings are layered with the `config` crate: an optional TOML file,
//! then `AUTHPROXY__*` environment variables, then explicit overrides
//! (command-line flags). Validation runs once all layers are merged.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::credentials::Credentials;
use crate::error::SettingsError;

/// Default settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "authproxy.toml";

const ENV_PREFIX: &str = "AUTHPROXY";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Base URL of the admin API, e.g. `https://authproxy.internal/admin`.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            username: String::new(),
            password: String::new(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            logging: LoggingSettings::default(),
        }
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("logging", &self.logging)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ProviderSettings {
    /// Checks that every required value is present and usable.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.endpoint.trim().is_empty() {
            return Err(SettingsError::Missing("endpoint"));
        }
        self.endpoint_url()?;
        if self.username.is_empty() {
            return Err(SettingsError::Missing("username"));
        }
        if self.password.is_empty() {
            return Err(SettingsError::Missing("password"));
        }
        if self.request_timeout_ms == 0 {
            return Err(SettingsError::Invalid(
                "request_timeout_ms must be > 0".into(),
            ));
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(SettingsError::Invalid(format!(
                "logging.level must be one of {valid_levels:?}"
            )));
        }
        Ok(())
    }

    /// Parses the endpoint, dropping trailing slashes.
    ///
    /// # Errors
    ///
    /// Fails for unparsable URLs and non-http(s) schemes.
    pub fn endpoint_url(&self) -> Result<Url, SettingsError> {
        let trimmed = self.endpoint.trim().trim_end_matches('/');
        let url = Url::parse(trimmed)
            .map_err(|e| SettingsError::invalid_endpoint(&self.endpoint, e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(SettingsError::invalid_endpoint(
                    &self.endpoint,
                    format!("unsupported scheme {other}"),
                ));
            }
        }
        if url.cannot_be_a_base() {
            return Err(SettingsError::invalid_endpoint(
                &self.endpoint,
                "endpoint cannot carry a path",
            ));
        }
        Ok(url)
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::basic(&self.username, &self.password)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Values that win over both the file and the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Loads and validates settings.
///
/// With `path = None` the default file is used only if it exists. An explicit
/// path must exist.
///
/// # Errors
///
/// Returns an error when a source cannot be read or the merged settings do
/// not validate.
pub fn load_settings(
    path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<ProviderSettings, SettingsError> {
    let mut builder = Config::builder();
    match path {
        Some(p) => {
            if !p.exists() {
                return Err(SettingsError::MissingFile(p.to_path_buf()));
            }
            builder = builder.add_source(File::from(p.to_path_buf()));
        }
        None => {
            let default_path = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if default_path.exists() {
                builder = builder.add_source(File::from(default_path));
            }
        }
    }
    // Environment variable overrides, e.g. AUTHPROXY__ENDPOINT=https://...
    // Values stay strings: credentials like "007" must not be read as numbers.
    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));
    builder = builder
        .set_override_option("endpoint", overrides.endpoint.clone())?
        .set_override_option("username", overrides.username.clone())?
        .set_override_option("password", overrides.password.clone())?;

    let settings: ProviderSettings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    tracing::debug!(endpoint = %settings.endpoint, "loaded provider settings");
    Ok(settings)
}
