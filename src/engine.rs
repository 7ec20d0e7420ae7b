//! Protocol engine
//!
//! One engine drives one WebSocket session: it decodes inbound frames,
//! walks the subscription handshake, keeps books and reference data
//! current, and hands decoded objects to the sinks. The engine never
//! touches the network; [`ProtocolEngine::on_message`] returns the
//! frames the caller should send, which keeps every transition testable
//! with canned strings.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{RecorderError, Result};
use crate::metrics::Metrics;
use crate::orderbook::BookRegistry;
use crate::refdata::ReferenceDataCache;
use crate::sink::FanoutSink;
use crate::timestamp::Timestamp;
use crate::wire::{
    BookMessage, InstrumentMessage, MessageKind, Ping, Pong, SubscribeBook, SubscribeInstrument,
    SubscribeTrade, TradesMessage, WireMessage,
};

/// Maximum symbols per subscribe request.
const SUBSCRIBE_BATCH: usize = 32;

/// Where the session stands in its subscription handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Connected, initial ping sent, waiting for its pong.
    Connecting,
    /// Instrument subscription sent, waiting for the snapshot.
    AwaitingInstrumentSubscription,
    /// Instrument snapshot in hand, book/trade subscriptions being
    /// issued. Transient within the snapshot handler; subscriptions are
    /// fire-and-forget so the engine settles without waiting for acks.
    AwaitingBookTradeSubscription,
    /// Fully subscribed.
    Steady,
}

pub struct ProtocolEngine {
    config: Arc<Config>,
    metrics: Arc<Metrics>,
    sink: FanoutSink,
    state: EngineState,
    refdata: ReferenceDataCache,
    registry: BookRegistry,
    next_req_id: u64,
}

impl ProtocolEngine {
    pub fn new(config: Arc<Config>, metrics: Arc<Metrics>, sink: FanoutSink) -> Self {
        let registry = BookRegistry::new(config.book_depth);
        Self {
            config,
            metrics,
            sink,
            state: EngineState::Connecting,
            refdata: ReferenceDataCache::new(),
            registry,
            next_req_id: 1,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn registry(&self) -> &BookRegistry {
        &self.registry
    }

    pub fn refdata(&self) -> &ReferenceDataCache {
        &self.refdata
    }

    fn next_req_id(&mut self) -> u64 {
        let id = self.next_req_id;
        self.next_req_id += 1;
        id
    }

    /// The keepalive ping frame, also the session's opening message.
    pub fn ping_request(&mut self) -> Result<String> {
        let request = Ping::new(self.next_req_id());
        self.metrics.pings_total.inc();
        request.to_message()
    }

    /// Process one inbound frame. Returns the frames to send in reply.
    pub fn on_message(&mut self, raw: &str, recv_tm: Timestamp) -> Result<Vec<String>> {
        self.metrics.messages_total.inc();
        self.metrics.bytes_total.inc_by(raw.len() as u64);

        match WireMessage::decode(raw, recv_tm)? {
            WireMessage::Pong(pong) => self.on_pong(&pong),
            WireMessage::Instrument(message) => self.on_instrument(&message),
            WireMessage::Book(message) => self.on_book(&message).map(|()| Vec::new()),
            WireMessage::Trade(message) => self.on_trades(&message).map(|()| Vec::new()),
            WireMessage::Heartbeat(_) => {
                self.metrics.heartbeats_total.inc();
                Ok(Vec::new())
            }
            WireMessage::SubscribeAck(ack) => {
                debug!(ack = %ack, "subscribe acknowledged");
                Ok(Vec::new())
            }
            WireMessage::Unknown(frame) => {
                warn!(frame = %frame, "unrecognized message, ignoring");
                Ok(Vec::new())
            }
        }
    }

    /// The first pong completes the connect handshake and triggers the
    /// instrument subscription. Later pongs are keepalive replies.
    fn on_pong(&mut self, pong: &Pong) -> Result<Vec<String>> {
        self.metrics.pongs_total.inc();
        debug!(req_id = ?pong.req_id, "pong received");

        if self.state != EngineState::Connecting {
            return Ok(Vec::new());
        }

        let request = SubscribeInstrument::new(self.next_req_id());
        self.state = EngineState::AwaitingInstrumentSubscription;
        info!("subscribing to instrument reference data");
        Ok(vec![request.to_message()?])
    }

    fn on_instrument(&mut self, message: &InstrumentMessage) -> Result<Vec<String>> {
        self.refdata.accept(message);
        for pair in &message.pairs {
            if self.config.wants_pair(&pair.symbol) {
                self.registry.accept_pair(pair);
            }
        }
        self.metrics.tracked_symbols.set(self.registry.len() as i64);
        self.sink.accept_instrument(message)?;

        // Only the snapshot advances the handshake; later updates just
        // refresh the cache and books.
        if message.header.kind != Some(MessageKind::Snapshot)
            || self.state != EngineState::AwaitingInstrumentSubscription
        {
            return Ok(Vec::new());
        }

        let mut symbols: Vec<String> = self.registry.symbols().map(str::to_string).collect();
        symbols.sort();
        info!(
            num_assets = self.refdata.num_assets(),
            num_pairs = self.refdata.num_pairs(),
            num_recorded = symbols.len(),
            "instrument snapshot received"
        );

        self.state = EngineState::AwaitingBookTradeSubscription;
        let mut outbound = Vec::new();
        if !symbols.is_empty() {
            for batch in symbols.chunks(SUBSCRIBE_BATCH) {
                if self.config.capture_book {
                    let request = SubscribeBook::new(
                        self.next_req_id(),
                        self.config.book_depth,
                        true,
                        batch.to_vec(),
                    );
                    outbound.push(request.to_message()?);
                }
                if self.config.capture_trades {
                    let request = SubscribeTrade::new(self.next_req_id(), true, batch.to_vec());
                    outbound.push(request.to_message()?);
                }
            }
        }

        // Subscriptions are fire-and-forget; the engine does not wait
        // for acks before settling.
        self.state = EngineState::Steady;
        Ok(outbound)
    }

    fn on_book(&mut self, message: &BookMessage) -> Result<()> {
        match message.header.kind {
            Some(MessageKind::Snapshot) => self.metrics.book_snapshots_total.inc(),
            Some(MessageKind::Update) => self.metrics.book_updates_total.inc(),
            None => {}
        }

        if let Err(e) = self.registry.accept_book(message) {
            if matches!(e, RecorderError::ChecksumMismatch { .. }) {
                self.metrics.checksum_failures_total.inc();
            }
            return Err(e);
        }

        self.sink.accept_book(message)
    }

    fn on_trades(&mut self, message: &TradesMessage) -> Result<()> {
        for trade in &message.trades {
            if self.refdata.pair_precision(&trade.symbol).is_none() {
                return Err(RecorderError::PrecisionNotFound(trade.symbol.clone()));
            }
        }
        self.metrics.trades_total.inc_by(message.trades.len() as u64);
        self.sink.accept_trades(message)
    }
}
