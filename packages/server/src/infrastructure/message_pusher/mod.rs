//! メッセージ送信（通知）の実装
//!
//! - `websocket`: registry-backed fan-out over WebSocket connections

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
