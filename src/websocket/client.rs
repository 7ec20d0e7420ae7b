//! WebSocket client
//!
//! Thin wrapper over one stream: connect, receive text frames, send
//! text frames. Transport-level ping/pong and close are handled here so
//! the engine only ever sees application messages.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use crate::error::{RecorderError, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct WebSocketClient {
    stream: Option<WsStream>,
    endpoint: String,
}

impl WebSocketClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            stream: None,
            endpoint: endpoint.to_string(),
        }
    }

    pub async fn connect(&mut self) -> Result<()> {
        info!(url = %self.endpoint, "connecting to venue WebSocket");

        let (ws_stream, response) = connect_async(&self.endpoint)
            .await
            .map_err(|e| RecorderError::Connection(format!("failed to connect: {e}")))?;

        info!(status = ?response.status(), "WebSocket connected");
        self.stream = Some(ws_stream);
        Ok(())
    }

    /// Receive the next application frame. `Ok(None)` means a
    /// transport-level frame was absorbed and the caller should poll
    /// again.
    pub async fn recv(&mut self) -> Result<Option<String>> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| RecorderError::Connection("not connected".to_string()))?;

        match stream.next().await {
            Some(Ok(Message::Text(text))) => {
                debug!(len = text.len(), "received text frame");
                Ok(Some(text))
            }
            Some(Ok(Message::Binary(data))) => {
                Ok(Some(String::from_utf8_lossy(&data).to_string()))
            }
            Some(Ok(Message::Ping(data))) => {
                debug!("received transport ping, replying");
                if let Some(stream) = self.stream.as_mut() {
                    let _ = stream.send(Message::Pong(data)).await;
                }
                Ok(None)
            }
            Some(Ok(Message::Pong(_))) => Ok(None),
            Some(Ok(Message::Close(frame))) => {
                warn!(frame = ?frame, "received close frame");
                self.stream = None;
                Err(RecorderError::Connection("connection closed".to_string()))
            }
            Some(Ok(Message::Frame(_))) => Ok(None),
            Some(Err(e)) => {
                error!(error = %e, "WebSocket error");
                self.stream = None;
                Err(RecorderError::Transport(e.to_string()))
            }
            None => {
                warn!("WebSocket stream ended");
                self.stream = None;
                Err(RecorderError::Connection("stream ended".to_string()))
            }
        }
    }

    /// Send one application frame.
    pub async fn send(&mut self, text: String) -> Result<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| RecorderError::Connection("not connected".to_string()))?;
        stream
            .send(Message::Text(text))
            .await
            .map_err(|e| RecorderError::Transport(e.to_string()))
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.close(None).await;
        }
    }
}
