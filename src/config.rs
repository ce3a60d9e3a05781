//! Client configuration files
//!
//! A small YAML (or JSON) document describing how the HTTP clients talk to
//! an API:
//!
//! ```yaml
//! base_url: https://api.example.com/v1/
//! timeout_secs: 30
//! user_agent: my-tool/1.0
//! headers:
//!   Authorization: Bearer sk_test_123
//! rate_limit:
//!   requests_per_second: 5
//!   burst_size: 5
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Client configuration as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL relative cursors are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    /// Optional client-side rate limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            headers: StringMap::new(),
            rate_limit: None,
        }
    }
}

impl ClientConfig {
    /// Parse a YAML or JSON document
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than 0"));
        }
        if let Some(base) = &self.base_url {
            url::Url::parse(base)
                .map_err(|e| Error::config(format!("invalid base_url '{base}': {e}")))?;
        }
        Ok(())
    }

    /// Set a header, replacing any existing value
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Convert into the runtime client configuration
    pub fn to_http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().timeout(Duration::from_secs(self.timeout_secs));

        if let Some(base) = &self.base_url {
            builder = builder.base_url(base);
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(limit) = &self.rate_limit {
            builder = builder.rate_limit(limit.clone());
        }
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        builder.build()
    }
}

impl From<&ClientConfig> for HttpClientConfig {
    fn from(config: &ClientConfig) -> Self {
        config.to_http_config()
    }
}

/// Load a client configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    ClientConfig::parse(&content)
}

/// Split a `Name: value` header argument
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| Error::config(format!("header '{raw}' must look like 'Name: value'")))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(Error::config(format!("header '{raw}' has an empty name")));
    }

    Ok((name.to_string(), value.trim().to_string()))
}
