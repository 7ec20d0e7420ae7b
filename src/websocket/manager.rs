//! Session manager
//!
//! Runs WebSocket sessions forever with exponential-backoff reconnect.
//! Each session gets a fresh protocol engine, so reconnects replay the
//! whole handshake and rebuild every book from new snapshots.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, sleep, timeout, MissedTickBehavior};
use tracing::{error, info, warn};

use super::WebSocketClient;
use crate::config::Config;
use crate::engine::ProtocolEngine;
use crate::error::{RecorderError, Result};
use crate::metrics::Metrics;
use crate::sink::{ChannelSink, FanoutSink, RecordEvent};
use crate::timestamp::Timestamp;

/// Maximum backoff delay in milliseconds (60 seconds)
const MAX_BACKOFF_MS: u64 = 60_000;
/// Cooldown period after which reconnect attempts are reset (5 minutes)
const RECONNECT_COOLDOWN_SECS: u64 = 300;
/// Receive timeout before the connection is considered stale
const RECV_TIMEOUT_SECS: u64 = 45;

/// Resolves once the shutdown flag is raised. A sender dropped without
/// ever signalling pends forever rather than resolving, so backoff
/// sleeps and read loops are not short-circuited into a busy loop.
async fn shutdown_signal(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

pub struct SessionManager {
    config: Arc<Config>,
    metrics: Arc<Metrics>,
    publish_tx: mpsc::UnboundedSender<RecordEvent>,
    shutdown: watch::Receiver<bool>,
    reconnect_attempts: u32,
    last_successful_connection: Option<Instant>,
}

impl SessionManager {
    pub fn new(
        config: Arc<Config>,
        metrics: Arc<Metrics>,
        publish_tx: mpsc::UnboundedSender<RecordEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            metrics,
            publish_tx,
            shutdown,
            reconnect_attempts: 0,
            last_successful_connection: None,
        }
    }

    /// Run sessions until shutdown is signalled.
    pub async fn run(&mut self) -> Result<()> {
        info!("starting session manager");

        loop {
            if *self.shutdown.borrow() {
                info!("shutdown requested, stopping session manager");
                return Ok(());
            }

            if let Some(last_success) = self.last_successful_connection {
                if last_success.elapsed() > Duration::from_secs(RECONNECT_COOLDOWN_SECS)
                    && self.reconnect_attempts > 0
                {
                    info!(
                        previous_attempts = self.reconnect_attempts,
                        "resetting reconnect counter after cooldown"
                    );
                    self.reconnect_attempts = 0;
                }
            }

            match self.run_session().await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    error!(error = %e, "session ended");
                    self.reconnect_attempts += 1;
                    self.metrics.reconnects_total.inc();

                    let base_delay = self.config.reconnect_delay_ms
                        * 2u64.pow(self.reconnect_attempts.min(6));
                    let delay = Duration::from_millis(base_delay.min(MAX_BACKOFF_MS));
                    warn!(
                        attempt = self.reconnect_attempts,
                        delay_secs = delay.as_secs(),
                        "reconnecting after error"
                    );

                    tokio::select! {
                        _ = sleep(delay) => {}
                        _ = shutdown_signal(&mut self.shutdown) => {}
                    }
                }
            }
        }
    }

    /// One full session: connect, handshake, process until failure or
    /// shutdown. `Ok(())` means shutdown was requested.
    async fn run_session(&mut self) -> Result<()> {
        let mut client = WebSocketClient::new(&self.config.ws_endpoint);
        client.connect().await?;

        self.last_successful_connection = Some(Instant::now());
        self.reconnect_attempts = 0;

        let sink = FanoutSink::new()
            .with_instrument_sink(Box::new(ChannelSink::new(self.publish_tx.clone())))
            .with_book_sink(Box::new(ChannelSink::new(self.publish_tx.clone())))
            .with_trade_sink(Box::new(ChannelSink::new(self.publish_tx.clone())));
        let mut engine = ProtocolEngine::new(self.config.clone(), self.metrics.clone(), sink);

        // Opening ping; its pong starts the subscription handshake.
        client.send(engine.ping_request()?).await?;

        let mut ping_interval = interval(Duration::from_secs(self.config.ping_interval_secs));
        ping_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ping_interval.tick().await; // first tick fires immediately

        let recv_timeout = Duration::from_secs(RECV_TIMEOUT_SECS);
        loop {
            tokio::select! {
                _ = shutdown_signal(&mut self.shutdown) => {
                    info!("shutdown requested, closing session");
                    client.close().await;
                    return Ok(());
                }
                _ = ping_interval.tick() => {
                    client.send(engine.ping_request()?).await?;
                }
                received = timeout(recv_timeout, client.recv()) => {
                    match received {
                        Ok(Ok(Some(text))) => {
                            let outbound = engine.on_message(&text, Timestamp::now())?;
                            for frame in outbound {
                                client.send(frame).await?;
                            }
                        }
                        Ok(Ok(None)) => continue,
                        Ok(Err(e)) => return Err(e),
                        Err(_) => {
                            warn!("no frame within timeout, connection is stale");
                            return Err(RecorderError::Connection(
                                "receive timeout".to_string(),
                            ));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_signal_resolves_on_flag() {
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();
        timeout(Duration::from_millis(100), shutdown_signal(&mut rx))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_signal_resolves_on_prior_flag() {
        let (tx, mut rx) = watch::channel(true);
        drop(tx);
        timeout(Duration::from_millis(100), shutdown_signal(&mut rx))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_sender_never_signals_shutdown() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        // Must pend, not resolve: a resolved future here would skip
        // every backoff sleep and spin the reconnect loop.
        let result = timeout(Duration::from_millis(100), shutdown_signal(&mut rx)).await;
        assert!(result.is_err());
    }
}
