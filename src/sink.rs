//! Publication sinks
//!
//! Small capability traits, one per decoded object kind, composed via a
//! fan-out adapter. The engine only ever sees the fan-out; concrete
//! sinks decide where the objects go. [`ChannelSink`] hands fully
//! formed decoded values to the publisher task over a channel, which is
//! the only data that crosses a thread boundary.

use tokio::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::error::{RecorderError, Result};
use crate::wire::{BookMessage, InstrumentMessage, TradesMessage};

pub trait InstrumentSink: Send {
    fn accept_instrument(&self, message: &InstrumentMessage) -> Result<()>;
}

pub trait BookSink: Send {
    fn accept_book(&self, message: &BookMessage) -> Result<()>;
}

pub trait TradeSink: Send {
    fn accept_trades(&self, message: &TradesMessage) -> Result<()>;
}

/// Forwards each accepted object to every registered sink.
#[derive(Default)]
pub struct FanoutSink {
    instrument_sinks: Vec<Box<dyn InstrumentSink>>,
    book_sinks: Vec<Box<dyn BookSink>>,
    trade_sinks: Vec<Box<dyn TradeSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instrument_sink(mut self, sink: Box<dyn InstrumentSink>) -> Self {
        self.instrument_sinks.push(sink);
        self
    }

    pub fn with_book_sink(mut self, sink: Box<dyn BookSink>) -> Self {
        self.book_sinks.push(sink);
        self
    }

    pub fn with_trade_sink(mut self, sink: Box<dyn TradeSink>) -> Self {
        self.trade_sinks.push(sink);
        self
    }

    pub fn accept_instrument(&self, message: &InstrumentMessage) -> Result<()> {
        for sink in &self.instrument_sinks {
            sink.accept_instrument(message)?;
        }
        Ok(())
    }

    pub fn accept_book(&self, message: &BookMessage) -> Result<()> {
        for sink in &self.book_sinks {
            sink.accept_book(message)?;
        }
        Ok(())
    }

    pub fn accept_trades(&self, message: &TradesMessage) -> Result<()> {
        for sink in &self.trade_sinks {
            sink.accept_trades(message)?;
        }
        Ok(())
    }
}

/// A decoded object on its way to the publisher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RecordEvent {
    Instrument(InstrumentMessage),
    Book(BookMessage),
    Trades(TradesMessage),
}

/// Sends decoded objects to the publisher task.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<RecordEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<RecordEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: RecordEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|e| RecorderError::Sink(format!("publisher channel closed: {e}")))
    }
}

impl InstrumentSink for ChannelSink {
    fn accept_instrument(&self, message: &InstrumentMessage) -> Result<()> {
        self.send(RecordEvent::Instrument(message.clone()))
    }
}

impl BookSink for ChannelSink {
    fn accept_book(&self, message: &BookMessage) -> Result<()> {
        self.send(RecordEvent::Book(message.clone()))
    }
}

impl TradeSink for ChannelSink {
    fn accept_trades(&self, message: &TradesMessage) -> Result<()> {
        self.send(RecordEvent::Trades(message.clone()))
    }
}
