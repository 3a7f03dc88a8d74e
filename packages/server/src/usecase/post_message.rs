//! UseCase: メッセージ投稿処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PostMessageUseCase::execute() メソッド
//! - 検証順序: トークン → 空 → 長すぎ
//! - 成功時のみ投稿者を含む全セッションへブロードキャストされること

use std::sync::Arc;

use crate::domain::{
    ChatEvent, ConnectionHandle, MessageBody, MessagePusher, PostError, ServerMessage,
    SessionRegistry, SessionToken,
};

/// メッセージ投稿のユースケース
pub struct PostMessageUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl PostMessageUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// メッセージ投稿を実行
    ///
    /// The status reply is always sent to the poster. On success the chat
    /// event is then broadcast to every session, the poster included.
    ///
    /// # Arguments
    ///
    /// * `owner` - この接続のセッショントークン
    /// * `connection` - 応答を書き込む接続
    /// * `presented_token` - リクエストに含まれていたトークン
    /// * `body` - メッセージ本文（未検証）
    pub async fn execute(
        &self,
        owner: &SessionToken,
        connection: &ConnectionHandle,
        presented_token: &str,
        body: String,
    ) -> Result<ChatEvent, PostError> {
        let result = self.validate(owner, presented_token, body).await;

        let reply = ServerMessage::PostResult(result.as_ref().map(|_| ()).map_err(|e| *e));
        if let Err(e) = self.message_pusher.push_to(connection, &reply).await {
            tracing::error!(token = %owner, "Failed to write post response: {}", e);
        }

        let event = result?;
        let delivered = self
            .message_pusher
            .broadcast(&ServerMessage::Chat(event.clone()))
            .await;
        tracing::debug!(token = %owner, "Chat message delivered to {} sessions", delivered);

        Ok(event)
    }

    async fn validate(
        &self,
        owner: &SessionToken,
        presented_token: &str,
        body: String,
    ) -> Result<ChatEvent, PostError> {
        if !owner.matches(presented_token) {
            return Err(PostError::InvalidToken);
        }
        let identity = self
            .registry
            .lookup(owner)
            .await
            .ok_or(PostError::InvalidToken)?;
        let body = MessageBody::new(body)?;

        Ok(ChatEvent::user(identity.display_name, body))
    }
}
