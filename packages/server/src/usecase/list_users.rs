//! UseCase: オンライン参加者一覧の取得

use std::sync::Arc;

use crate::domain::{
    ConnectionHandle, DisplayName, MessagePusher, RosterError, ServerMessage, SessionRegistry,
    SessionToken,
};

/// 参加者一覧取得のユースケース
pub struct ListUsersUseCase {
    registry: Arc<dyn SessionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ListUsersUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Reply to `connection` with the roster, or `invalid_token` with an
    /// empty list. Never broadcasts and never mutates the registry.
    pub async fn execute(
        &self,
        owner: &SessionToken,
        connection: &ConnectionHandle,
        presented_token: &str,
    ) -> Result<Vec<DisplayName>, RosterError> {
        let authorized =
            owner.matches(presented_token) && self.registry.lookup(owner).await.is_some();
        let result = if authorized {
            Ok(self.registry.snapshot_names().await)
        } else {
            Err(RosterError::InvalidToken)
        };

        let reply = ServerMessage::Roster(result.clone());
        if let Err(e) = self.message_pusher.push_to(connection, &reply).await {
            tracing::error!(token = %owner, "Failed to write online users response: {}", e);
        }

        result
    }
}
