//! OutboundSink implementations.
//!
//! The write half of an upgraded axum WebSocket is the only production sink.
//! Unit tests write into an unbounded channel instead.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, stream::SplitSink};

use crate::domain::{MessagePushError, OutboundSink};

#[async_trait]
impl OutboundSink for SplitSink<WebSocket, Message> {
    async fn send_text(&mut self, text: String) -> Result<(), MessagePushError> {
        self.send(Message::Text(text.into()))
            .await
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}

#[cfg(test)]
#[async_trait]
impl OutboundSink for tokio::sync::mpsc::UnboundedSender<String> {
    async fn send_text(&mut self, text: String) -> Result<(), MessagePushError> {
        self.send(text)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}
