//! Configuration loading via `ortho-config`.

use std::fmt;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Default base URL of the Linode API.
pub const DEFAULT_API_URL: &str = "https://api.linode.com/v4";

/// Linode client settings derived from environment variables, configuration
/// files, and CLI flags.
#[derive(Clone, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "LINODE")]
pub struct LinodeConfig {
    /// Personal access token used as the bearer credential. A missing token
    /// is not detected here; requests fail once they reach the API.
    pub token: Option<String>,
    /// Base URL of the Linode API.
    #[ortho_config(default = "https://api.linode.com/v4".to_owned())]
    pub api_url: String,
    /// Logs request and response bodies at debug level when enabled.
    #[ortho_config(default = false)]
    pub debug: bool,
}

impl fmt::Debug for LinodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinodeConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Default for LinodeConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_owned(),
            debug: false,
        }
    }
}

impl LinodeConfig {
    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("linode-snapshotter")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation. The token is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the API URL is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField(String::from(
                "missing Linode API URL: set LINODE_API_URL or unset it to use the default",
            )));
        }
        Ok(())
    }

    /// Builds the credentials handed to the provider client.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.token.clone().unwrap_or_default())
    }
}

/// Bearer token used to authenticate against the Linode API.
///
/// Acquired once before the backend is built and never refreshed.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    /// Wraps a bearer token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Returns whether a token is present at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.token.is_empty()
    }

    pub(crate) fn bearer_token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
