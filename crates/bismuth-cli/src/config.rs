use std::path::PathBuf;

use anyhow::{Context, Result};
use bismuth_sdk::ClientConfig;
use serde::Deserialize;

/// Contents of `~/.config/bismuth/config.toml`.
///
/// ```toml
/// [api]
/// key = "..."
/// url = "https://api.bismuth.cloud"
/// organization_id = 12
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
    pub url: Option<String>,
    pub organization_id: Option<u64>,
}

/// Values given on the command line or through the environment. They win
/// over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub organization_id: Option<u64>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("could not determine config directory")?
            .join("bismuth");
        Ok(dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config file")
    }

    pub fn client_config(self, overrides: Overrides) -> Result<ClientConfig> {
        let key = overrides
            .api_key
            .or(self.api.key)
            .context("no API key; set BISMUTH_API_KEY or add `key` to the [api] section of the config file")?;

        let mut config = ClientConfig::new(key);
        if let Some(url) = overrides.api_url.or(self.api.url) {
            config = config.base_url(url);
        }
        if let Some(id) = overrides.organization_id.or(self.api.organization_id) {
            config = config.organization_id(id);
        }
        Ok(config)
    }
}
