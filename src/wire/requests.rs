//! Outbound requests
//!
//! Client messages sent over the stream: the keepalive ping and the
//! three channel subscriptions. Each carries a client-assigned `req_id`
//! so replies can be correlated.

use serde::Serialize;

use crate::error::Result;
use crate::orderbook::Depth;

use super::{CHANNEL_BOOK, CHANNEL_INSTRUMENT, CHANNEL_TRADE, METHOD_PING, METHOD_SUBSCRIBE};

/// `{"method":"ping","req_id":N}`
#[derive(Debug, Clone, Serialize)]
pub struct Ping {
    method: &'static str,
    req_id: u64,
}

impl Ping {
    pub fn new(req_id: u64) -> Self {
        Self {
            method: METHOD_PING,
            req_id,
        }
    }

    pub fn to_message(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Serialize)]
struct InstrumentParams {
    channel: &'static str,
    snapshot: bool,
}

/// Subscribe to the instrument channel (asset + pair reference data).
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeInstrument {
    method: &'static str,
    params: InstrumentParams,
    req_id: u64,
}

impl SubscribeInstrument {
    pub fn new(req_id: u64) -> Self {
        Self {
            method: METHOD_SUBSCRIBE,
            params: InstrumentParams {
                channel: CHANNEL_INSTRUMENT,
                snapshot: true,
            },
            req_id,
        }
    }

    pub fn to_message(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Serialize)]
struct BookParams {
    channel: &'static str,
    depth: Depth,
    snapshot: bool,
    symbol: Vec<String>,
}

/// Subscribe to the book channel for a set of symbols at a given depth.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeBook {
    method: &'static str,
    params: BookParams,
    req_id: u64,
}

impl SubscribeBook {
    pub fn new(req_id: u64, depth: Depth, snapshot: bool, symbols: Vec<String>) -> Self {
        Self {
            method: METHOD_SUBSCRIBE,
            params: BookParams {
                channel: CHANNEL_BOOK,
                depth,
                snapshot,
                symbol: symbols,
            },
            req_id,
        }
    }

    pub fn to_message(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Serialize)]
struct TradeParams {
    channel: &'static str,
    snapshot: bool,
    symbol: Vec<String>,
}

/// Subscribe to the trade channel for a set of symbols.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeTrade {
    method: &'static str,
    params: TradeParams,
    req_id: u64,
}

impl SubscribeTrade {
    pub fn new(req_id: u64, snapshot: bool, symbols: Vec<String>) -> Self {
        Self {
            method: METHOD_SUBSCRIBE,
            params: TradeParams {
                channel: CHANNEL_TRADE,
                snapshot,
                symbol: symbols,
            },
            req_id,
        }
    }

    pub fn to_message(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
