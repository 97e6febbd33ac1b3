//! Client configuration.

use crate::options::PageParams;
use crate::{HateoasError, HateoasResult};
use serde::{Deserialize, Serialize};

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Entry lifetime in milliseconds.
    pub life_time_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            life_time_ms: 5 * 60 * 1000, // 5 minutes
        }
    }
}

/// Settings handed to the HTTP transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the HAL API (e.g. `http://localhost:8080/api/v1`).
    pub api_root_url: String,
    /// When set, substituted for `api_root_url` in every generated URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    pub cache: CacheConfig,
    pub default_page: PageParams,
    pub http: HttpConfig,
}

impl ClientConfig {
    /// Creates a configuration for the given API root with defaults elsewhere.
    pub fn new(api_root_url: impl Into<String>) -> Self {
        Self {
            api_root_url: api_root_url.into(),
            ..Default::default()
        }
    }

    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    pub fn with_cache(mut self, enabled: bool, life_time_ms: u64) -> Self {
        self.cache = CacheConfig {
            enabled,
            life_time_ms,
        };
        self
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> HateoasResult<Self> {
        let config = Self::parse_toml_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document without validating it, for callers that
    /// layer overrides on top before calling [`Self::validate`].
    pub fn parse_toml_str(source: &str) -> HateoasResult<Self> {
        toml::from_str(source).map_err(|e| HateoasError::Config(e.to_string()))
    }

    pub fn validate(&self) -> HateoasResult<()> {
        if self.api_root_url.trim().is_empty() {
            return Err(HateoasError::Config("api_root_url is required".to_string()));
        }
        if self.default_page.size == 0 {
            return Err(HateoasError::Config(
                "default_page.size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Root URL without a trailing slash.
    pub fn root_url(&self) -> &str {
        self.api_root_url.trim_end_matches('/')
    }

    /// Configured proxy URL without a trailing slash, ignoring blank values.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }

    /// Base used for every generated URL: the proxy when set, else the root.
    pub fn effective_base(&self) -> &str {
        self.proxy().unwrap_or_else(|| self.root_url())
    }
}
