use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Runtime override for the server address.
pub const SERVER_URL_ENV_VAR: &str = "DRYDOCK_SERVER_URL";
/// Runtime override for the API key.
pub const API_KEY_ENV_VAR: &str = "DRYDOCK_API_KEY";
/// Timeout applied to every request made by the API client.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 60;
/// Keyring entry coordinates for the stored API key.
pub const KEYRING_SERVICE: &str = "drydock-cli";
pub const KEYRING_USER: &str = "default";

/// Non-secret connection settings persisted between invocations.
/// The API key itself lives in the OS keyring, never on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    pub version: String,
    pub server_url: String,
}

impl CliConfig {
    pub fn new(server_url: String) -> Self {
        Self {
            version: "1".to_string(),
            server_url,
        }
    }

    /// Get the path to the user's drydock config directory
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".drydock"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the stored configuration, or None if this machine has never
    /// connected to a server.
    pub fn load() -> Result<Option<Self>> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).context("Failed to read drydock configuration")?;

        let config: Self =
            toml::from_str(&contents).context("Failed to parse drydock configuration")?;

        Ok(Some(config))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(&path, contents).context("Failed to write configuration")?;

        Ok(())
    }
}
