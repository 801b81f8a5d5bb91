use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Base URL used when neither the caller nor `BISMUTH_API` provide one.
pub const DEFAULT_BASE_URL: &str = "https://api.bismuth.cloud";

pub const API_KEY_ENV: &str = "BISMUTH_API_KEY";
pub const BASE_URL_ENV: &str = "BISMUTH_API";
pub const ORGANIZATION_ENV: &str = "BISMUTH_ORGANIZATION_ID";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Settings for a [`crate::Client`].
///
/// Only the API key is required. Without an organization id the client
/// falls back to the single organization the key is a member of.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub organization_id: Option<u64>,
    pub base_url: String,
    /// Delay between two polls of an asynchronous request.
    pub poll_interval: Duration,
    /// Upper bound on the total time spent polling. `None` waits forever.
    pub poll_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            organization_id: None,
            base_url: default_base_url(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: None,
        }
    }

    /// Build a config from `BISMUTH_API_KEY`, `BISMUTH_API` and
    /// `BISMUTH_ORGANIZATION_ID`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| Error::Config(format!("{API_KEY_ENV} is not set")))?;
        let mut config = Self::new(api_key);
        if let Ok(raw) = std::env::var(ORGANIZATION_ENV) {
            let id = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{ORGANIZATION_ENV} must be a numeric id, got '{raw}'"))
            })?;
            config.organization_id = Some(id);
        }
        Ok(config)
    }

    pub fn organization_id(mut self, id: u64) -> Self {
        self.organization_id = Some(id);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("organization_id", &self.organization_id)
            .field("base_url", &self.base_url)
            .field("poll_interval", &self.poll_interval)
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}

fn default_base_url() -> String {
    std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}
