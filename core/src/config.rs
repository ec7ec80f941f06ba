//! Client configuration.
//!
//! `ClientConfig` is a plain value handed to `TasksApi::create`; the client
//! never looks at the process environment. `EnvConfig` is the loader that
//! does, for binaries that want `API_URL` / `API_KEY` resolved once at
//! startup.

use std::time::Duration;

use envconfig::Envconfig;

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Settings a `TasksApi` is built from. Immutable once the client owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            headers: vec![("Cache-Control".to_string(), "no-cache".to_string())],
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a default header, replacing any existing one with the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, "")
    }
}

/// Environment inputs for the client.
#[derive(Envconfig, Clone, Debug)]
pub struct EnvConfig {
    #[envconfig(from = "API_URL", default = "http://localhost:4000/")]
    pub api_url: String,
    #[envconfig(from = "API_KEY", default = "")]
    pub api_key: String,
}

impl EnvConfig {
    /// An empty `API_URL` counts as unset.
    pub fn into_client_config(self) -> ClientConfig {
        let base_url = if self.api_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            &self.api_url
        };
        ClientConfig::new(base_url, &self.api_key)
    }
}
