//! Server state shared by every connection task.

use std::sync::Arc;

use crate::{
    domain::{MessagePusher, SessionRegistry},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemorySessionRegistry},
    usecase::{DisconnectUseCase, ListUsersUseCase, LoginUseCase, PostMessageUseCase},
};

/// Shared application state
pub struct AppState {
    /// LoginUseCase（ログインのユースケース）
    pub login_usecase: Arc<LoginUseCase>,
    /// PostMessageUseCase（メッセージ投稿のユースケース）
    pub post_message_usecase: Arc<PostMessageUseCase>,
    /// ListUsersUseCase（参加者一覧取得のユースケース）
    pub list_users_usecase: Arc<ListUsersUseCase>,
    /// DisconnectUseCase（切断のユースケース）
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    /// Registry（ヘルスチェック用の参照）
    registry: Arc<dyn SessionRegistry>,
}

impl AppState {
    /// Wire every use case to the same registry and pusher.
    pub fn new(registry: Arc<dyn SessionRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            login_usecase: Arc::new(LoginUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            post_message_usecase: Arc::new(PostMessageUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            list_users_usecase: Arc::new(ListUsersUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            disconnect_usecase: Arc::new(DisconnectUseCase::new(
                registry.clone(),
                message_pusher,
            )),
            registry,
        }
    }

    /// Number of logged in sessions
    pub async fn count_sessions(&self) -> usize {
        self.registry.count().await
    }

    /// State backed by a fresh in-memory registry and the WebSocket pusher.
    pub fn in_memory() -> Self {
        let registry: Arc<dyn SessionRegistry> = Arc::new(InMemorySessionRegistry::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new(registry.clone()));
        Self::new(registry, message_pusher)
    }
}
