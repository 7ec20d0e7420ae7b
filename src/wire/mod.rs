//! Wire protocol
//!
//! Inbound messages are decoded exactly once into a closed
//! [`WireMessage`] variant keyed on the `channel`/`method` field, then
//! matched exhaustively by the engine. Outbound requests live in
//! [`requests`].

pub mod requests;
pub mod responses;

use serde_json::Value;

use crate::error::{RecorderError, Result};
use crate::timestamp::Timestamp;

pub use requests::{Ping, SubscribeBook, SubscribeInstrument, SubscribeTrade};
pub use responses::{
    Asset, AssetStatus, BookEntry, BookMessage, Header, InstrumentData, InstrumentMessage,
    MessageKind, OrdType, Pair, PairStatus, Pong, PriceLevel, Trade, TradeSide, TradesMessage,
};

pub const FIELD_CHANNEL: &str = "channel";
pub const FIELD_METHOD: &str = "method";
pub const FIELD_DATA: &str = "data";
pub const FIELD_TYPE: &str = "type";

pub const CHANNEL_INSTRUMENT: &str = "instrument";
pub const CHANNEL_BOOK: &str = "book";
pub const CHANNEL_TRADE: &str = "trade";
pub const CHANNEL_HEARTBEAT: &str = "heartbeat";

pub const METHOD_PING: &str = "ping";
pub const METHOD_PONG: &str = "pong";
pub const METHOD_SUBSCRIBE: &str = "subscribe";

/// An inbound message, classified by channel or method.
#[derive(Debug, Clone)]
pub enum WireMessage {
    Instrument(InstrumentMessage),
    Book(BookMessage),
    Trade(TradesMessage),
    Heartbeat(Header),
    Pong(Pong),
    SubscribeAck(Value),
    Unknown(String),
}

impl WireMessage {
    /// Decode one raw frame. `recv_tm` is stamped into the header of
    /// every channel message.
    pub fn decode(raw: &str, recv_tm: Timestamp) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let object = value
            .as_object()
            .ok_or_else(|| RecorderError::Decode(format!("message is not an object: {raw}")))?;

        if let Some(channel) = object.get(FIELD_CHANNEL).and_then(Value::as_str) {
            let kind = decode_kind(object)?;
            let header = Header::new(recv_tm, channel, kind);
            return match channel {
                CHANNEL_INSTRUMENT => {
                    let data: InstrumentData = serde_json::from_value(take_data(object, raw)?)?;
                    Ok(WireMessage::Instrument(InstrumentMessage {
                        header,
                        assets: data.assets,
                        pairs: data.pairs,
                    }))
                }
                CHANNEL_BOOK => {
                    let entries: Vec<BookEntry> = serde_json::from_value(take_data(object, raw)?)?;
                    Ok(WireMessage::Book(BookMessage { header, entries }))
                }
                CHANNEL_TRADE => {
                    let trades: Vec<Trade> = serde_json::from_value(take_data(object, raw)?)?;
                    Ok(WireMessage::Trade(TradesMessage { header, trades }))
                }
                CHANNEL_HEARTBEAT => Ok(WireMessage::Heartbeat(header)),
                _ => Ok(WireMessage::Unknown(raw.to_string())),
            };
        }

        if let Some(method) = object.get(FIELD_METHOD).and_then(Value::as_str) {
            return match method {
                METHOD_PONG => Ok(WireMessage::Pong(serde_json::from_value(value.clone())?)),
                METHOD_SUBSCRIBE => Ok(WireMessage::SubscribeAck(value)),
                _ => Ok(WireMessage::Unknown(raw.to_string())),
            };
        }

        Ok(WireMessage::Unknown(raw.to_string()))
    }
}

fn decode_kind(object: &serde_json::Map<String, Value>) -> Result<Option<MessageKind>> {
    match object.get(FIELD_TYPE) {
        None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| RecorderError::Decode(format!("bad message type: {e}"))),
    }
}

fn take_data(object: &serde_json::Map<String, Value>, raw: &str) -> Result<Value> {
    object
        .get(FIELD_DATA)
        .cloned()
        .ok_or_else(|| RecorderError::Decode(format!("missing '{FIELD_DATA}' field: {raw}")))
}
