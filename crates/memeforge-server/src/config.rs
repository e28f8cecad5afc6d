//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Maximum accepted image size in bytes.
    /// Env: `MAX_UPLOAD_SIZE`
    /// Default: 10 MiB
    pub max_upload_size: usize,

    /// Simulated confirmation latency for contract deployment.
    /// Env: `DEPLOY_DELAY_MS`
    /// Default: 3000
    pub deploy_delay: Duration,

    /// Address reported as the trading-fee recipient in deploy responses.
    /// Informational only — nothing enforces the fee.
    /// Env: `FEE_RECIPIENT`
    pub fee_recipient: String,

    /// Optional SQLite database path.  When set, records survive restarts;
    /// when unset, everything lives in process memory.
    /// Env: `STORE_PATH`
    pub store_path: Option<PathBuf>,

    /// Sustained per-IP request rate for the mutating endpoints.
    /// Env: `RATE_LIMIT_RPS`
    /// Default: `10`
    pub rate_limit_rps: f64,

    /// Per-IP burst capacity for the mutating endpoints.
    /// Env: `RATE_LIMIT_BURST`
    /// Default: `30`
    pub rate_limit_burst: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 8080).into(),
            max_upload_size: 10 * 1024 * 1024, // 10 MiB
            deploy_delay: Duration::from_millis(3000),
            fee_recipient: "0x73cf2b2eb72a243602e9dcda9efec6473e5c1741".to_string(),
            store_path: None,
            rate_limit_rps: 10.0,
            rate_limit_burst: 30.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Ok(val) = std::env::var("MAX_UPLOAD_SIZE") {
            if let Ok(n) = val.parse::<usize>() {
                config.max_upload_size = n;
            } else {
                tracing::warn!(value = %val, "Invalid MAX_UPLOAD_SIZE, using default");
            }
        }

        if let Ok(val) = std::env::var("DEPLOY_DELAY_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                config.deploy_delay = Duration::from_millis(ms);
            } else {
                tracing::warn!(value = %val, "Invalid DEPLOY_DELAY_MS, using default");
            }
        }

        if let Ok(addr) = std::env::var("FEE_RECIPIENT") {
            if memeforge_shared::validate::is_eth_address(&addr) {
                config.fee_recipient = addr;
            } else {
                tracing::warn!(value = %addr, "Invalid FEE_RECIPIENT, using default");
            }
        }

        if let Ok(path) = std::env::var("STORE_PATH") {
            if !path.is_empty() {
                config.store_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(val) = std::env::var("RATE_LIMIT_RPS") {
            if let Ok(n) = val.parse::<f64>() {
                config.rate_limit_rps = n;
            }
        }

        if let Ok(val) = std::env::var("RATE_LIMIT_BURST") {
            if let Ok(n) = val.parse::<f64>() {
                config.rate_limit_burst = n;
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.max_upload_size, 10 * 1024 * 1024);
        assert_eq!(config.deploy_delay, Duration::from_millis(3000));
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_default_fee_recipient_is_valid_address() {
        let config = ServerConfig::default();
        assert!(memeforge_shared::validate::is_eth_address(
            &config.fee_recipient
        ));
    }
}
