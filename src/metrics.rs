//! Prometheus counters for the recording session.

use prometheus::{IntCounter, IntGauge, Opts, Registry};

pub struct Metrics {
    pub messages_total: IntCounter,
    pub bytes_total: IntCounter,
    pub pings_total: IntCounter,
    pub pongs_total: IntCounter,
    pub heartbeats_total: IntCounter,
    pub book_snapshots_total: IntCounter,
    pub book_updates_total: IntCounter,
    pub trades_total: IntCounter,
    pub checksum_failures_total: IntCounter,
    pub reconnects_total: IntCounter,
    pub tracked_symbols: IntGauge,
}

impl Metrics {
    /// Build the collectors without registering them; callers that want
    /// scraping register against a registry via [`Metrics::register`].
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            messages_total: IntCounter::with_opts(Opts::new(
                "recorder_messages_total",
                "Inbound frames received from the venue",
            ))?,
            bytes_total: IntCounter::with_opts(Opts::new(
                "recorder_bytes_total",
                "Inbound payload bytes received from the venue",
            ))?,
            pings_total: IntCounter::with_opts(Opts::new(
                "recorder_pings_total",
                "Application-level pings sent",
            ))?,
            pongs_total: IntCounter::with_opts(Opts::new(
                "recorder_pongs_total",
                "Application-level pongs received",
            ))?,
            heartbeats_total: IntCounter::with_opts(Opts::new(
                "recorder_heartbeats_total",
                "Heartbeat messages received",
            ))?,
            book_snapshots_total: IntCounter::with_opts(Opts::new(
                "recorder_book_snapshots_total",
                "Book snapshot messages applied",
            ))?,
            book_updates_total: IntCounter::with_opts(Opts::new(
                "recorder_book_updates_total",
                "Book update messages applied",
            ))?,
            trades_total: IntCounter::with_opts(Opts::new(
                "recorder_trades_total",
                "Individual trades recorded",
            ))?,
            checksum_failures_total: IntCounter::with_opts(Opts::new(
                "recorder_checksum_failures_total",
                "Book checksum verification failures",
            ))?,
            reconnects_total: IntCounter::with_opts(Opts::new(
                "recorder_reconnects_total",
                "WebSocket sessions re-established after a drop",
            ))?,
            tracked_symbols: IntGauge::with_opts(Opts::new(
                "recorder_tracked_symbols",
                "Symbols with a live book",
            ))?,
        })
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.messages_total.clone()))?;
        registry.register(Box::new(self.bytes_total.clone()))?;
        registry.register(Box::new(self.pings_total.clone()))?;
        registry.register(Box::new(self.pongs_total.clone()))?;
        registry.register(Box::new(self.heartbeats_total.clone()))?;
        registry.register(Box::new(self.book_snapshots_total.clone()))?;
        registry.register(Box::new(self.book_updates_total.clone()))?;
        registry.register(Box::new(self.trades_total.clone()))?;
        registry.register(Box::new(self.checksum_failures_total.clone()))?;
        registry.register(Box::new(self.reconnects_total.clone()))?;
        registry.register(Box::new(self.tracked_symbols.clone()))?;
        Ok(())
    }
}
