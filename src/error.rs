//! Error types for the recorder

use thiserror::Error;

/// Recorder errors
///
/// Decode, sequencing and checksum failures are fatal to the message
/// handler call that produced them; the session loop decides whether to
/// tear the connection down. None of these continue with a guessed
/// default value.
#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("failed to decode message: {0}")]
    Decode(String),

    #[error("no reference data for symbol: {0}")]
    PrecisionNotFound(String),

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("checksum mismatch for {symbol}: expected {expected}, computed {computed}")]
    ChecksumMismatch {
        symbol: String,
        expected: u32,
        computed: u32,
    },

    #[error("WebSocket connection error: {0}")]
    Connection(String),

    #[error("WebSocket message error: {0}")]
    Transport(String),

    #[error("sink error: {0}")]
    Sink(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for RecorderError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        RecorderError::Connection(err.to_string())
    }
}

impl From<serde_json::Error> for RecorderError {
    fn from(err: serde_json::Error) -> Self {
        RecorderError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for RecorderError {
    fn from(err: std::io::Error) -> Self {
        RecorderError::Sink(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecorderError>;
