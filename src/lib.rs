//! Kraken market-data recorder
//!
//! Connects to the venue's v2 WebSocket stream, walks the subscription
//! handshake, maintains checksum-verified order books alongside asset
//! and pair reference data, and publishes every decoded object over a
//! Unix socket for downstream consumers.

use std::sync::Arc;

pub mod config;
pub mod decimal;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod orderbook;
pub mod publisher;
pub mod refdata;
pub mod sink;
pub mod timestamp;
pub mod websocket;
pub mod wire;

pub use config::Config;
pub use decimal::DecimalValue;
pub use engine::{EngineState, ProtocolEngine};
pub use error::{RecorderError, Result};
pub use metrics::Metrics;
pub use orderbook::{BookRegistry, BookSide, Depth, Side, SymbolBook};
pub use publisher::Publisher;
pub use refdata::{PairPrecision, ReferenceDataCache};
pub use sink::{BookSink, ChannelSink, FanoutSink, InstrumentSink, RecordEvent, TradeSink};
pub use timestamp::Timestamp;
pub use websocket::{SessionManager, WebSocketClient};
pub use wire::WireMessage;

/// Application state shared across components
pub struct AppState {
    pub config: Arc<Config>,
    pub metrics: Arc<Metrics>,
}
