//! Client configuration.
//!
//! # Design
//! There is no global default configuration. `ClientConfig::default()` (or
//! `from_env()`) produces the baseline explicitly, and `ClientOptions`
//! overrides it field by field when a client is constructed. A built
//! configuration is never modified afterwards.

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_API_PATH: &str = "/admin/api.php";
pub const DEFAULT_API_OUTPUT: &str = "json";
pub const DEFAULT_USER_AGENT: &str = concat!("activecampaign-rs/", env!("CARGO_PKG_VERSION"));

pub const ENV_API_KEY: &str = "ACTIVECAMPAIGN_API_KEY";
pub const ENV_API_ENDPOINT: &str = "ACTIVECAMPAIGN_API_ENDPOINT";
pub const ENV_API_PATH: &str = "ACTIVECAMPAIGN_API_PATH";
pub const ENV_API_OUTPUT: &str = "ACTIVECAMPAIGN_API_OUTPUT";
pub const ENV_USER_AGENT: &str = "ACTIVECAMPAIGN_USER_AGENT";

/// Resolved, immutable settings for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_endpoint: String,
    pub api_path: String,
    pub api_output: String,
    pub user_agent: String,
    /// Off by default. Transports log a warning when built without it.
    pub verify_tls: bool,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_endpoint: String::new(),
            api_path: DEFAULT_API_PATH.to_string(),
            api_output: DEFAULT_API_OUTPUT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            verify_tls: false,
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Built-in defaults overridden by any `ACTIVECAMPAIGN_*` variables set
    /// in the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let options = ClientOptions {
            api_key: lookup(ENV_API_KEY),
            api_endpoint: lookup(ENV_API_ENDPOINT),
            api_path: lookup(ENV_API_PATH),
            api_output: lookup(ENV_API_OUTPUT),
            user_agent: lookup(ENV_USER_AGENT),
            ..ClientOptions::default()
        };
        options.resolve(&Self::default())
    }

    /// The request URL: endpoint and path joined by exactly one `/`.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_endpoint.trim_end_matches('/'),
            self.api_path.trim_start_matches('/')
        )
    }
}

/// Per-client overrides. Unset fields fall back to the defaults passed to
/// [`ClientOptions::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub api_key: Option<String>,
    pub api_endpoint: Option<String>,
    pub api_path: Option<String>,
    pub api_output: Option<String>,
    pub user_agent: Option<String>,
    pub verify_tls: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl ClientOptions {
    pub fn resolve(self, defaults: &ClientConfig) -> ClientConfig {
        ClientConfig {
            api_key: self.api_key.unwrap_or_else(|| defaults.api_key.clone()),
            api_endpoint: self.api_endpoint.unwrap_or_else(|| defaults.api_endpoint.clone()),
            api_path: self.api_path.unwrap_or_else(|| defaults.api_path.clone()),
            api_output: self.api_output.unwrap_or_else(|| defaults.api_output.clone()),
            user_agent: self.user_agent.unwrap_or_else(|| defaults.user_agent.clone()),
            verify_tls: self.verify_tls.unwrap_or(defaults.verify_tls),
            timeout: self.timeout_secs.map(Duration::from_secs).or(defaults.timeout),
        }
    }
}
