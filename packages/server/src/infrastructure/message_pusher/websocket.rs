//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - ドメインメッセージを JSON エンベロープに変換
//! - 特定の接続への送信（push_to）
//! - 登録中の全セッションへの送信（broadcast）
//!
//! A broadcast encodes once, takes a registry snapshot, then writes to each
//! recipient in turn under that recipient's own write lock. A failed
//! recipient is only logged: removing it is the job of its own read loop.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{
        ConnectionHandle, MessagePushError, MessagePusher, ReservedWrite, ServerMessage,
        SessionRegistry,
    },
    infrastructure::dto::websocket::ServerEnvelope,
};

pub struct WebSocketMessagePusher {
    registry: Arc<dyn SessionRegistry>,
}

impl WebSocketMessagePusher {
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }
}

fn encode(message: &ServerMessage) -> Result<String, MessagePushError> {
    ServerEnvelope::from(message)
        .to_json()
        .map_err(|e| MessagePushError::Encode(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn push_to(
        &self,
        connection: &ConnectionHandle,
        message: &ServerMessage,
    ) -> Result<(), MessagePushError> {
        let text = encode(message)?;
        connection.send_text(text).await
    }

    async fn push_reserved(
        &self,
        writer: ReservedWrite,
        message: &ServerMessage,
    ) -> Result<(), MessagePushError> {
        // エンコードに失敗しても予約はここで解放される
        let text = encode(message)?;
        writer.send_text(text).await
    }

    async fn broadcast(&self, message: &ServerMessage) -> usize {
        let text = match encode(message) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to encode broadcast: {}", e);
                return 0;
            }
        };

        let recipients = self.registry.snapshot().await;
        let mut delivered = 0;
        for recipient in &recipients {
            // ブロードキャストでは一部の送信失敗を許容
            match recipient.connection.send_text(text.clone()).await {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    token = %recipient.token,
                    name = %recipient.display_name,
                    "Failed to push message: {}",
                    e
                ),
            }
        }
        tracing::debug!(
            "Broadcasted message to {}/{} sessions",
            delivered,
            recipients.len()
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatEvent, DisplayName, MessageBody, SessionToken},
        infrastructure::repository::InMemorySessionRegistry,
    };
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信
    // - broadcast: 登録中の全セッションへの送信
    // - 一部の送信失敗が他の受信者への配信を止めないこと
    // ========================================

    async fn login(
        registry: &InMemorySessionRegistry,
        name: &str,
    ) -> (SessionToken, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = SessionToken::generate();
        registry
            .try_register(token, name.to_string(), ConnectionHandle::new(tx))
            .await
            .unwrap();
        (token, rx)
    }

    fn chat(name: &str, body: &str) -> ServerMessage {
        ServerMessage::Chat(ChatEvent::user(
            DisplayName::new(name.to_string()).unwrap(),
            MessageBody::new(body.to_string()).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にエンコード済みメッセージを送信できる
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = WebSocketMessagePusher::new(registry);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = ConnectionHandle::new(tx);

        // when (操作):
        let result = pusher
            .push_to(&connection, &ServerMessage::PostResult(Ok(())))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some(r#"{"type":4,"status":1}"#.to_string()));
    }

    #[tokio::test]
    async fn test_push_reserved_writes_then_releases() {
        // テスト項目: 予約済みの接続に送信し、その後は通常の送信もできる
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = WebSocketMessagePusher::new(registry);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = ConnectionHandle::new(tx);
        let writer = connection.reserve().await;

        // when (操作):
        let reserved = pusher
            .push_reserved(writer, &ServerMessage::PostResult(Ok(())))
            .await;
        let after = pusher
            .push_to(&connection, &ServerMessage::PostResult(Ok(())))
            .await;

        // then (期待する結果):
        assert!(reserved.is_ok());
        assert!(after.is_ok());
        assert_eq!(rx.recv().await.as_deref(), Some(r#"{"type":4,"status":1}"#));
        assert_eq!(rx.recv().await.as_deref(), Some(r#"{"type":4,"status":1}"#));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_registered_session() {
        // テスト項目: 登録中の全セッションに1回ずつ届く
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let (_, mut alice_rx) = login(&registry, "alice").await;
        let (_, mut bob_rx) = login(&registry, "bob").await;
        let pusher = WebSocketMessagePusher::new(registry);

        // when (操作):
        let delivered = pusher.broadcast(&chat("alice", "hi")).await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        let expected = r#"{"type":5,"nickname":"alice","msg":"hi","isSystem":false}"#;
        assert_eq!(alice_rx.recv().await.as_deref(), Some(expected));
        assert_eq!(bob_rx.recv().await.as_deref(), Some(expected));
        assert!(alice_rx.try_recv().is_err());
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 1人への送信失敗は他の受信者への配信を止めず、登録も消さない
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let (_, alice_rx) = login(&registry, "alice").await;
        let (_, mut bob_rx) = login(&registry, "bob").await;
        drop(alice_rx);
        let pusher = WebSocketMessagePusher::new(registry.clone());

        // when (操作):
        let delivered = pusher.broadcast(&chat("bob", "still here")).await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(bob_rx.recv().await.is_some());
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_broadcast_with_no_sessions() {
        // テスト項目: 誰も登録されていなくてもエラーにならない
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = WebSocketMessagePusher::new(registry);

        let delivered = pusher.broadcast(&chat("ghost", "anyone?")).await;

        assert_eq!(delivered, 0);
    }
}
