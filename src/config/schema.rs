//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::outbound::OutboundKind;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,

    /// URL test timing.
    pub probe: ProbeConfig,

    /// Candidate proxies, referenced by name from groups.
    pub proxies: Vec<ProxyConfig>,

    /// URL-test groups.
    pub groups: Vec<GroupConfig>,

    /// Local listeners forwarding through a group.
    pub tunnels: Vec<TunnelConfig>,
}

/// A single candidate proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Unique proxy name.
    pub name: String,

    /// Transport flavour.
    pub kind: OutboundKind,

    /// Upstream proxy address ("host:port"); required for `http`.
    #[serde(default)]
    pub address: Option<String>,
}

/// A URL-test group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupConfig {
    /// Unique group name.
    pub name: String,

    /// Member proxy names, in fallback order.
    pub proxies: Vec<String>,

    /// Probe target URL.
    #[serde(default = "default_test_url")]
    pub url: String,

    /// Probe interval in seconds.
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_test_url() -> String {
    "http://www.gstatic.com/generate_204".to_string()
}

fn default_interval() -> u64 {
    300
}

/// Probe timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-candidate URL test timeout in seconds (also the connect timeout).
    pub timeout_secs: u64,

    /// Deadline for a whole probe cycle in seconds.
    pub cycle_deadline_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            cycle_deadline_secs: 10,
        }
    }
}

/// Local TCP listener forwarding to a fixed target through a group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TunnelConfig {
    /// Bind address (e.g., "127.0.0.1:7890").
    pub listen: String,

    /// Group to dial through.
    pub group: String,

    /// Destination ("host:port").
    pub target: String,

    /// Maximum concurrent tunnelled connections.
    #[serde(default = "default_max_tunnel_conns")]
    pub max_connections: usize,
}

fn default_max_tunnel_conns() -> usize {
    1024
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // WARNING: placeholder, set a real key in deployment.
            api_key: "CHANGE_ME".to_string(),
            bind_address: "127.0.0.1:9091".to_string(),
        }
    }
}
