//! Explorer configuration
//!
//! Configuration is loaded from YAML. Every section has defaults, so an empty
//! file (or no file at all) yields a working setup pointed at the public
//! networks.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable overriding `default_network`
pub const NETWORK_ENV: &str = "CHAINSCAN_NETWORK";

/// Environment variable overriding `server.port`
pub const PORT_ENV: &str = "CHAINSCAN_PORT";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete explorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Network used when a request carries no `network` query parameter
    #[serde(default = "default_network")]
    pub default_network: String,

    /// Backend indexing API per network name
    #[serde(default = "default_networks")]
    pub networks: BTreeMap<String, NetworkConfig>,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerSettings,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            default_network: default_network(),
            networks: default_networks(),
            http: HttpConfig::default(),
            server: ServerSettings::default(),
        }
    }
}

fn default_network() -> String {
    "MainNet".to_string()
}

fn default_networks() -> BTreeMap<String, NetworkConfig> {
    [
        ("MainNet", "https://blockscout.mainnet.ocean.jellyfishsdk.com"),
        ("TestNet", "https://blockscout.testnet.ocean.jellyfishsdk.com"),
        ("Changi", "https://blockscout.changi.ocean.jellyfishsdk.com"),
        ("Playground", "http://localhost:4000"),
    ]
    .into_iter()
    .map(|(name, url)| (name.to_string(), NetworkConfig::new(url)))
    .collect()
}

impl ExplorerConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from a YAML string and validate it
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply `CHAINSCAN_NETWORK` / `CHAINSCAN_PORT` overrides
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(NETWORK_ENV).ok(),
            std::env::var(PORT_ENV).ok(),
        )
    }

    /// Apply explicit overrides; unparseable ports are ignored
    #[must_use]
    pub fn with_overrides(mut self, network: Option<String>, port: Option<String>) -> Self {
        if let Some(network) = network.filter(|n| !n.is_empty()) {
            self.default_network = network;
        }
        if let Some(port) = port.and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        self
    }

    /// Check that the default network exists and every base URL parses
    pub fn validate(&self) -> Result<()> {
        if self.networks.is_empty() {
            return Err(Error::missing_field("networks"));
        }
        if !self.networks.contains_key(&self.default_network) {
            return Err(Error::unknown_network(&self.default_network));
        }
        for (name, network) in &self.networks {
            url::Url::parse(&network.base_url).map_err(|e| {
                Error::config(format!("Invalid base_url for network '{name}': {e}"))
            })?;
        }
        if self.server.max_sessions == 0 {
            return Err(Error::config("server.max_sessions must be at least 1"));
        }
        Ok(())
    }

    /// Resolve a network by name, falling back to the default network
    pub fn network(&self, name: Option<&str>) -> Result<(&str, &NetworkConfig)> {
        let name = name.unwrap_or(&self.default_network);
        self.networks
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| Error::unknown_network(name))
    }

    /// Check if a network name is the configured default
    pub fn is_default_network(&self, name: &str) -> bool {
        self.default_network == name
    }

    /// Render the effective configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ============================================================================
// Networks
// ============================================================================

/// Backend endpoint for one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Base URL of the indexing API
    pub base_url: String,
}

impl NetworkConfig {
    /// Create a network config
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub retry_backoff: BackoffConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// User agent sent to the backend
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_backoff: BackoffConfig::default(),
            rate_limit: RateLimitConfig::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    /// Build the client configuration for one backend base URL
    pub fn client_config(&self, base_url: &str) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(base_url)
            .timeout(Duration::from_secs(self.timeout_seconds))
            .max_retries(self.max_retries)
            .backoff(
                self.retry_backoff.backoff_type,
                Duration::from_millis(self.retry_backoff.initial_ms),
                Duration::from_millis(self.retry_backoff.max_ms),
            )
            .user_agent(&self.user_agent);

        builder = if self.rate_limit.enabled {
            builder.rate_limit(RateLimiterConfig::new(
                self.rate_limit.requests_per_second,
                self.rate_limit.burst_size,
            ))
        } else {
            builder.no_rate_limit()
        };

        builder.build()
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_user_agent() -> String {
    format!("chainscan/{}", env!("CARGO_PKG_VERSION"))
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    10_000
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Disable to send requests unthrottled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Requests per second limit
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,

    /// Burst size
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            requests_per_second: default_rps(),
            burst_size: default_burst(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_rps() -> u32 {
    10
}

fn default_burst() -> u32 {
    10
}

// ============================================================================
// Server Settings
// ============================================================================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on concurrently tracked view sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_max_sessions() -> usize {
    10_000
}
