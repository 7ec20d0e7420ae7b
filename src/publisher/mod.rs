//! IPC publisher
//!
//! Drains the record channel and writes each decoded object to a Unix
//! socket as a length-prefixed MessagePack frame. Consumers come and go;
//! publish failures drop the frame and retry the connection on the next
//! event rather than stalling the recording session.

use std::path::Path;

use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{RecorderError, Result};
use crate::sink::RecordEvent;

pub struct Publisher {
    socket_path: String,
    stream: Option<UnixStream>,
}

impl Publisher {
    pub fn new(socket_path: &str) -> Self {
        Self {
            socket_path: socket_path.to_string(),
            stream: None,
        }
    }

    async fn connect(&mut self) -> Result<()> {
        let path = Path::new(&self.socket_path);
        if !path.exists() {
            return Err(RecorderError::Sink(format!(
                "socket path does not exist: {}",
                self.socket_path
            )));
        }

        let stream = UnixStream::connect(path).await.map_err(|e| {
            RecorderError::Sink(format!("failed to connect to {}: {e}", self.socket_path))
        })?;
        self.stream = Some(stream);

        info!(path = %self.socket_path, "connected to IPC socket");
        Ok(())
    }

    /// Write one event as a 4-byte big-endian length prefix followed by
    /// the MessagePack body. Failures disconnect; the next publish
    /// reconnects.
    pub async fn publish(&mut self, event: &RecordEvent) -> Result<()> {
        let body = rmp_serde::to_vec(event)
            .map_err(|e| RecorderError::Sink(format!("failed to serialize: {e}")))?;

        let len = (body.len() as u32).to_be_bytes();
        let mut frame = Vec::with_capacity(4 + body.len());
        frame.extend_from_slice(&len);
        frame.extend_from_slice(&body);

        if self.stream.is_none() {
            if let Err(e) = self.connect().await {
                debug!(error = %e, "IPC socket unavailable, dropping event");
                return Ok(());
            }
        }

        if let Some(stream) = self.stream.as_mut() {
            if let Err(e) = stream.write_all(&frame).await {
                warn!(error = %e, "failed to write to IPC socket");
                self.stream = None;
            }
        }
        Ok(())
    }

    /// Drain the channel until every sender is dropped.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<RecordEvent>) {
        while let Some(event) = rx.recv().await {
            if let Err(e) = self.publish(&event).await {
                warn!(error = %e, "publish failed");
            }
        }
        info!("record channel closed, publisher stopping");
    }
}
