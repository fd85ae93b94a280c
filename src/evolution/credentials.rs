//! Evolution API credentials
//!
//! The host stores credentials as `{ "server-url": ..., "apikey": ... }`.
//! They are passed through opaquely; only the server URL is checked.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Credential type name the node asks the host for
pub const CREDENTIALS_NAME: &str = "evolutionApi";

/// Server URL and API key for one Evolution API deployment
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "server-url", alias = "serverUrl")]
    pub server_url: String,
    #[serde(rename = "apikey", alias = "apiKey")]
    pub api_key: String,
}

impl Credentials {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Server URL without trailing slashes
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    /// Check that the server URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(self.base_url())
            .map_err(|e| Error::InvalidCredentials(format!("server-url: {}", e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::InvalidCredentials(format!(
                "server-url: unsupported scheme '{}'",
                other
            ))),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server_url", &self.server_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
