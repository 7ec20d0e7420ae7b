//! WebSocket connection handling

mod client;
mod manager;

pub use client::WebSocketClient;
pub use manager::SessionManager;
