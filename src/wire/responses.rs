//! Decoded inbound messages
//!
//! Domain representations of the venue's instrument, book and trade
//! channels. See https://docs.kraken.com/websockets-v2/#instrument and
//! friends for the field inventory.

use serde::{Deserialize, Serialize};

use crate::decimal::DecimalValue;
use crate::timestamp::Timestamp;

/// Whether a channel message replaces state or patches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Snapshot,
    Update,
}

/// Attached to every decoded inbound message. `recv_tm` is assigned
/// locally at receipt; it is not a venue field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub recv_tm: Timestamp,
    pub channel: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
}

impl Header {
    pub fn new(recv_tm: Timestamp, channel: &str, kind: Option<MessageKind>) -> Self {
        Self {
            recv_tm,
            channel: channel.to_string(),
            kind,
        }
    }
}

/// One price level of one side. A quantity of exactly zero marks a
/// deletion in update messages and is never stored in a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: DecimalValue,
    pub qty: DecimalValue,
}

/// One book entry from the `data` array of a book channel message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookEntry {
    pub symbol: String,
    #[serde(default)]
    pub bids: Vec<PriceLevel>,
    #[serde(default)]
    pub asks: Vec<PriceLevel>,
    pub checksum: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookMessage {
    pub header: Header,
    pub entries: Vec<BookEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    DepositOnly,
    Disabled,
    Enabled,
    FundingTemporarilyDisabled,
    WithdrawalOnly,
    WorkInProgress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub status: AssetStatus,
    pub precision: u32,
    pub precision_display: u32,
    #[serde(default)]
    pub borrowable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral_value: Option<DecimalValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_rate: Option<DecimalValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairStatus {
    CancelOnly,
    Delisted,
    LimitOnly,
    Maintenance,
    Online,
    PostOnly,
    ReduceOnly,
    WorkInProgress,
}

/// Trading-pair reference data. The precisions here drive every
/// fixed-precision render and checksum digest for the symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pair {
    pub symbol: String,
    pub base: String,
    pub quote: String,
    pub status: PairStatus,
    pub price_precision: u32,
    pub qty_precision: u32,
    pub cost_precision: u32,
    pub price_increment: DecimalValue,
    pub qty_increment: DecimalValue,
    pub cost_min: DecimalValue,
    pub qty_min: DecimalValue,
    #[serde(default)]
    pub marginable: bool,
    #[serde(default)]
    pub has_index: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_initial: Option<DecimalValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_limit_long: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_limit_short: Option<i64>,
}

/// Payload of an instrument channel message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentData {
    pub assets: Vec<Asset>,
    pub pairs: Vec<Pair>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentMessage {
    pub header: Header,
    pub assets: Vec<Asset>,
    pub pairs: Vec<Pair>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrdType {
    Market,
    Limit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub side: TradeSide,
    pub ord_type: OrdType,
    pub price: DecimalValue,
    pub qty: DecimalValue,
    pub timestamp: Timestamp,
    pub trade_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradesMessage {
    pub header: Header,
    pub trades: Vec<Trade>,
}

/// Reply to an application-level ping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pong {
    #[serde(default)]
    pub req_id: Option<u64>,
    #[serde(default)]
    pub time_in: Option<String>,
    #[serde(default)]
    pub time_out: Option<String>,
}
