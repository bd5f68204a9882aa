//! Service configuration: base URL, optional API key and transport timeout.

use std::time::Duration;

/// Public reqres endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

/// Transport timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "REQRES_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "REQRES_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configuration from `REQRES_BASE_URL` and `REQRES_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Same as [`ServiceConfig::from_env`] with an injected variable lookup.
    /// Empty values count as unset.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let base_url = read(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url: normalize_base_url(&base_url),
            api_key: read(API_KEY_ENV),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Keep an explicitly configured key, otherwise fall back to the
    /// environment.
    pub fn resolve_api_key(self) -> Self {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Same as [`ServiceConfig::resolve_api_key`] with an injected lookup.
    pub fn resolve_api_key_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.is_none() {
            self.api_key = Self::from_env_with(lookup).api_key;
        }
        self
    }
}

pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
