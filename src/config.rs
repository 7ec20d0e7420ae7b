//! Configuration for the recorder

use std::collections::HashSet;
use std::env;

use serde::Deserialize;

use crate::orderbook::Depth;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Venue WebSocket endpoint
    pub ws_endpoint: String,

    /// Pairs to record; empty means every pair the venue lists
    pub pair_filter: HashSet<String>,

    /// Book subscription depth
    pub book_depth: Depth,

    /// Whether to subscribe to book data
    pub capture_book: bool,

    /// Whether to subscribe to trade data
    pub capture_trades: bool,

    /// Application-level ping cadence in seconds
    pub ping_interval_secs: u64,

    /// IPC socket path for publishing decoded objects
    pub publish_socket_path: String,

    /// Base reconnect delay in milliseconds
    pub reconnect_delay_ms: u64,

    /// Port for the health/metrics HTTP server
    pub health_port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let pair_filter: HashSet<String> = env::var("PAIR_FILTER")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .collect();

        let book_depth_raw: u32 = env::var("BOOK_DEPTH")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .unwrap_or(1000);
        let book_depth = Depth::try_from(book_depth_raw)
            .map_err(|e| anyhow::anyhow!("invalid BOOK_DEPTH: {e}"))?;

        let ping_interval_secs: u64 = env::var("PING_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);
        if ping_interval_secs == 0 {
            anyhow::bail!("PING_INTERVAL_SECS must be at least 1");
        }

        Ok(Self {
            ws_endpoint: env::var("WS_ENDPOINT")
                .unwrap_or_else(|_| "wss://ws.kraken.com/v2".to_string()),
            pair_filter,
            book_depth,
            capture_book: env::var("CAPTURE_BOOK")
                .map(|v| v != "0" && v.to_lowercase() != "false")
                .unwrap_or(true),
            capture_trades: env::var("CAPTURE_TRADES")
                .map(|v| v != "0" && v.to_lowercase() != "false")
                .unwrap_or(true),
            ping_interval_secs,
            publish_socket_path: env::var("PUBLISH_SOCKET_PATH")
                .unwrap_or_else(|_| "/tmp/kraken-recorder.sock".to_string()),
            reconnect_delay_ms: env::var("RECONNECT_DELAY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            health_port: env::var("HEALTH_PORT")
                .unwrap_or_else(|_| "9090".to_string())
                .parse()
                .unwrap_or(9090),
        })
    }

    /// True when the pair passes the configured filter.
    pub fn wants_pair(&self, symbol: &str) -> bool {
        self.pair_filter.is_empty() || self.pair_filter.contains(symbol)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ws_endpoint: "wss://ws.kraken.com/v2".to_string(),
            pair_filter: HashSet::new(),
            book_depth: Depth::default(),
            capture_book: true,
            capture_trades: true,
            ping_interval_secs: 30,
            publish_socket_path: "/tmp/kraken-recorder.sock".to_string(),
            reconnect_delay_ms: 1000,
            health_port: 9090,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_records_every_pair() {
        let config = Config::default();
        assert!(config.wants_pair("BTC/USD"));
        assert!(config.wants_pair("GST/USD"));
    }

    #[test]
    fn test_filter_limits_pairs() {
        let config = Config {
            pair_filter: ["BTC/USD".to_string()].into_iter().collect(),
            ..Config::default()
        };
        assert!(config.wants_pair("BTC/USD"));
        assert!(!config.wants_pair("GST/USD"));
    }
}
