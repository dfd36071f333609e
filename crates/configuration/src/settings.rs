use crate::error::ConfigError;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub apr: AprSettings,
}

/// Endpoint URLs. In practice these come from the environment
/// (`ARGUS__API__SUBGRAPH_URL`, `ARGUS__API__PRICE_LISTENER_URL`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// The GraphQL endpoint serving share prices and open trades.
    pub subgraph_url: String,
    /// The REST endpoint serving the latest mid price per pair.
    pub price_listener_url: String,
}

/// Parameters for the on-disk snapshot cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Directory the snapshot files live in.
    pub data_dir: String,
    /// How long a snapshot stays fresh.
    pub ttl_minutes: u64,
}

/// Dimensions of the APR modelling table.
#[derive(Debug, Clone, Deserialize)]
pub struct AprSettings {
    /// N: the largest return window, in days, to tabulate.
    pub max_window_days: usize,
    /// K: the deepest smoothing (number of overlapping windows averaged).
    pub max_smoothing_depth: usize,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.subgraph_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "api.subgraph_url must be set (ARGUS__API__SUBGRAPH_URL)".to_string(),
            ));
        }
        if self.api.price_listener_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "api.price_listener_url must be set (ARGUS__API__PRICE_LISTENER_URL)".to_string(),
            ));
        }
        if self.cache.ttl_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "cache.ttl_minutes must be at least 1".to_string(),
            ));
        }
        if self.apr.max_window_days == 0 || self.apr.max_smoothing_depth == 0 {
            return Err(ConfigError::ValidationError(
                "apr table dimensions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
