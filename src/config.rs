//! Configuration Management
//!
//! Handles persistent credential storage for evonode.

use crate::error::Error;
use crate::evolution::credentials::Credentials;
use crate::node::host::CredentialSource;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Overrides the stored server URL
pub const SERVER_URL_ENV: &str = "EVOLUTION_SERVER_URL";
/// Overrides the stored API key
pub const API_KEY_ENV: &str = "EVOLUTION_API_KEY";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Stored credentials by name
    #[serde(default)]
    pub credentials: BTreeMap<String, Credentials>,
    #[serde(skip)]
    override_server_url: Option<String>,
    #[serde(skip)]
    override_api_key: Option<String>,
    #[serde(skip)]
    profile: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("evonode").join("config.json"))
    }

    /// Load configuration from disk, then apply environment overrides
    pub fn load() -> Self {
        let config = match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        };

        config.with_overrides(std::env::var(SERVER_URL_ENV).ok(), std::env::var(API_KEY_ENV).ok())
    }

    /// Load from a specific file, defaulting when missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Layer override values over stored credentials.
    /// `None` and empty strings keep the current override.
    pub fn with_overrides(mut self, server_url: Option<String>, api_key: Option<String>) -> Self {
        if let Some(url) = server_url.filter(|s| !s.is_empty()) {
            self.override_server_url = Some(url);
        }
        if let Some(key) = api_key.filter(|s| !s.is_empty()) {
            self.override_api_key = Some(key);
        }
        self
    }

    /// Answer every credential lookup from the named entry
    pub fn with_profile(mut self, name: impl Into<String>) -> Self {
        self.profile = Some(name.into());
        self
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Store credentials under a name
    pub fn set_credentials(&mut self, name: &str, credentials: Credentials) {
        self.credentials.insert(name.to_string(), credentials);
    }

    /// Store the effective credentials for `name` as its saved entry
    pub fn store_effective(&mut self, name: &str) -> Result<Credentials> {
        let credentials = self
            .effective_credentials(name)
            .with_context(|| format!("No server URL and API key to store under '{}'", name))?;
        credentials
            .validate()
            .with_context(|| format!("Refusing to store credentials '{}'", name))?;

        self.set_credentials(name, credentials.clone());
        Ok(credentials)
    }

    /// Stored entry with overrides applied
    pub fn effective_credentials(&self, name: &str) -> Option<Credentials> {
        let stored = self.credentials.get(name);

        let server_url = self
            .override_server_url
            .clone()
            .or_else(|| stored.map(|c| c.server_url.clone()))?;
        let api_key = self
            .override_api_key
            .clone()
            .or_else(|| stored.map(|c| c.api_key.clone()))?;

        Some(Credentials::new(server_url, api_key))
    }
}

impl CredentialSource for Config {
    fn get_credentials(&self, name: &str) -> crate::error::Result<Credentials> {
        let name = self.profile.as_deref().unwrap_or(name);
        self.effective_credentials(name)
            .ok_or_else(|| Error::CredentialsNotFound(name.to_string()))
    }
}
