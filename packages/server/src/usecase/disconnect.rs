//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - ログイン済みセッションの切断: 登録解除、left イベント、参加者一覧の更新
//! - 未ログインのセッションの切断: 何もしない

use std::sync::Arc;

use crate::domain::{
    ChatEvent, ConnectedIdentity, MessagePusher, ServerMessage, SessionRegistry, SessionToken,
};

/// 切断のユースケース
pub struct DisconnectUseCase {
    registry: Arc<dyn SessionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// Removes the identity registered for `token`. When one was removed, the
    /// remaining sessions receive exactly one left event and one roster
    /// refresh. Returns the removed identity.
    pub async fn execute(&self, token: &SessionToken) -> Option<ConnectedIdentity> {
        let identity = self.registry.unregister(token).await?;
        let online_secs = (chrono::Utc::now() - identity.logged_in_at).num_seconds();
        tracing::info!(
            token = %token,
            name = %identity.display_name,
            online_secs,
            "Client logged out"
        );

        self.message_pusher
            .broadcast(&ServerMessage::Chat(ChatEvent::left(&identity.display_name)))
            .await;
        let names = self.registry.snapshot_names().await;
        self.message_pusher
            .broadcast(&ServerMessage::Roster(Ok(names)))
            .await;

        Some(identity)
    }
}
