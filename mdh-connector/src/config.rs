//! Hub connection configuration
//!
//! Values come from `<config dir>/mdh-connector/config.toml` (or an explicit path), with
//! `MDH_HUB_*` environment variables, including ones from a `.env` file, taking precedence.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConnectorError;

pub const HOSTNAME_ENV: &str = "MDH_HUB_HOSTNAME";
pub const USERNAME_ENV: &str = "MDH_HUB_USERNAME";
pub const TOKEN_ENV: &str = "MDH_HUB_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub token: String,
}

impl HubConfig {
    pub fn new(hostname: impl Into<String>, username: impl Into<String>, token: impl Into<String>) -> Self {
        HubConfig {
            hostname: hostname.into(),
            username: username.into(),
            token: token.into(),
        }
    }

    /// `~/.config/mdh-connector/config.toml` on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mdh-connector").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from the given or default file, then apply environment overrides
    ///
    /// A missing file is not an error; the environment alone may configure the hub.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let config = match path {
            Some(path) if path.exists() => {
                log::debug!("Loading hub configuration from {}", path.display());
                Self::from_file(&path)?
            }
            _ => HubConfig::default(),
        };

        Ok(config.apply_overrides(|key| std::env::var(key).ok()))
    }

    /// Replace fields with non-empty values from `lookup`, keyed by `MDH_HUB_*` names
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(hostname) = value(HOSTNAME_ENV) {
            self.hostname = hostname;
        }
        if let Some(username) = value(USERNAME_ENV) {
            self.username = username;
        }
        if let Some(token) = value(TOKEN_ENV) {
            self.token = token;
        }
        self
    }

    /// Nothing configured at all
    pub fn is_empty(&self) -> bool {
        [&self.hostname, &self.username, &self.token]
            .iter()
            .all(|value| value.trim().is_empty())
    }

    /// Fail on the first empty field: token, then username, then hostname
    pub fn validate(&self) -> Result<(), ConnectorError> {
        let required = [
            ("Hub Token", &self.token),
            ("Hub Username", &self.username),
            ("Hub Hostname", &self.hostname),
        ];

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(ConnectorError::MissingConfiguration { field: *field }),
            None => Ok(()),
        }
    }
}
