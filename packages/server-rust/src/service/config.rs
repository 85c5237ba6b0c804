use std::time::Duration;

use crate::network::NetworkConfig;
use crate::storage::StorageConfig;

/// Top-level server configuration assembled by the binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub network: NetworkConfig,
    pub storage: StorageConfig,
    /// Install the Prometheus recorder and expose `GET /metrics`.
    pub metrics_enabled: bool,
    /// How long shutdown waits for in-flight requests before giving up.
    pub drain_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            storage: StorageConfig::default(),
            metrics_enabled: false,
            drain_timeout: Duration::from_secs(30),
        }
    }
}
