//! UseCase: ログイン処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LoginUseCase::execute() メソッド
//! - 成功時: 登録、トークン付き応答、join イベントと参加者一覧のブロードキャスト
//! - 失敗時: エラー応答のみ（登録もブロードキャストもしない）

use std::sync::Arc;

use crate::domain::{
    ChatEvent, ConnectedIdentity, ConnectionHandle, LoginError, MessagePusher, ServerMessage,
    SessionRegistry, SessionToken,
};

/// ログインのユースケース
pub struct LoginUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LoginUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// ログインを実行
    ///
    /// The reply goes to `connection` first. Only on success are the joined
    /// event and a roster refresh broadcast, to every session including the
    /// new one.
    ///
    /// The connection's write lock is taken before registering, so a
    /// broadcast that sees the new session in the registry still reaches
    /// it only after the login reply.
    ///
    /// # Arguments
    ///
    /// * `token` - 接続時に発行されたセッショントークン
    /// * `connection` - 応答を書き込む接続
    /// * `display_name` - クライアントが希望する表示名（未検証）
    pub async fn execute(
        &self,
        token: SessionToken,
        connection: &ConnectionHandle,
        display_name: String,
    ) -> Result<ConnectedIdentity, LoginError> {
        let writer = connection.reserve().await;
        let result = self
            .registry
            .try_register(token, display_name, connection.clone())
            .await;

        let reply = ServerMessage::LoginResult(result.as_ref().map(|_| token).map_err(|e| *e));
        if let Err(e) = self.message_pusher.push_reserved(writer, &reply).await {
            tracing::error!(token = %token, "Failed to write login response: {}", e);
        }

        let identity = result?;
        tracing::info!(token = %token, name = %identity.display_name, "Client logged in");

        self.message_pusher
            .broadcast(&ServerMessage::Chat(ChatEvent::joined(&identity.display_name)))
            .await;
        let names = self.registry.snapshot_names().await;
        self.message_pusher
            .broadcast(&ServerMessage::Roster(Ok(names)))
            .await;

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, message_pusher::MockMessagePusher},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemorySessionRegistry,
        },
    };
    use mockall::predicate::always;
    use tokio::sync::mpsc;

    fn channel() -> (ConnectionHandle, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ConnectionHandle::new(tx), rx)
    }

    fn json(text: &str) -> serde_json::Value {
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_login_success_replies_then_broadcasts() {
        // テスト項目: ログイン成功時、応答 → join イベント → 参加者一覧 の順に届く
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new(registry.clone()));
        let usecase = LoginUseCase::new(registry.clone(), pusher);
        let token = SessionToken::generate();
        let (connection, mut rx) = channel();

        // when (操作):
        let result = usecase
            .execute(token, &connection, "alice".to_string())
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap().display_name.as_str(), "alice");
        assert_eq!(
            json(&rx.recv().await.unwrap()),
            serde_json::json!({"type": 2, "status": 1, "token": token.to_string()})
        );
        assert_eq!(
            json(&rx.recv().await.unwrap()),
            serde_json::json!({"type": 5, "msg": "alice joined the chat", "isSystem": true})
        );
        assert_eq!(
            json(&rx.recv().await.unwrap()),
            serde_json::json!({"type": 7, "status": 1, "users": ["alice"]})
        );
        assert!(registry.lookup(&token).await.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_login_reply_precedes_concurrent_broadcasts() {
        // テスト項目: ログイン中に他の投稿がブロードキャストされても、最初に届くのはログイン応答
        // given (前提条件): bob が投稿をブロードキャストし続けている
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new(registry.clone()));
        let (bob, _bob_rx) = channel();
        registry
            .try_register(SessionToken::generate(), "bob".to_string(), bob)
            .await
            .unwrap();
        let bob_name = DisplayName::new("bob".to_string()).unwrap();
        let broadcaster = {
            let pusher = pusher.clone();
            tokio::spawn(async move {
                for i in 0..200 {
                    let body = crate::domain::MessageBody::new(format!("chatter {i}")).unwrap();
                    pusher
                        .broadcast(&ServerMessage::Chat(ChatEvent::user(bob_name.clone(), body)))
                        .await;
                    tokio::task::yield_now().await;
                }
            })
        };
        let usecase = LoginUseCase::new(registry.clone(), pusher);
        let token = SessionToken::generate();
        let (connection, mut rx) = channel();

        // when (操作):
        usecase
            .execute(token, &connection, "alice".to_string())
            .await
            .unwrap();
        broadcaster.await.unwrap();

        // then (期待する結果):
        let first = json(&rx.recv().await.unwrap());
        assert_eq!(first["type"], 2);
        assert_eq!(first["token"], token.to_string());
    }

    #[tokio::test]
    async fn test_login_existing_sessions_see_join() {
        // テスト項目: 既存の参加者にも join イベントと参加者一覧が届く
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new(registry.clone()));
        let usecase = LoginUseCase::new(registry.clone(), pusher);
        let (alice, mut alice_rx) = channel();
        usecase
            .execute(SessionToken::generate(), &alice, "alice".to_string())
            .await
            .unwrap();
        while alice_rx.try_recv().is_ok() {}

        // when (操作):
        let (bob, _bob_rx) = channel();
        usecase
            .execute(SessionToken::generate(), &bob, "bob".to_string())
            .await
            .unwrap();

        // then (期待する結果): alice はログイン応答を受け取らない
        assert_eq!(
            json(&alice_rx.recv().await.unwrap()),
            serde_json::json!({"type": 5, "msg": "bob joined the chat", "isSystem": true})
        );
        assert_eq!(
            json(&alice_rx.recv().await.unwrap()),
            serde_json::json!({"type": 7, "status": 1, "users": ["alice", "bob"]})
        );
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_login_failure_never_broadcasts() {
        // テスト項目: ログイン失敗時は応答のみで、ブロードキャストしない
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        registry
            .try_register(SessionToken::generate(), "alice".to_string(), channel().0)
            .await
            .unwrap();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_reserved()
            .withf(|_, message| {
                *message == ServerMessage::LoginResult(Err(LoginError::NameTaken))
            })
            .times(1)
            .returning(|_, _| Ok(()));
        pusher.expect_broadcast().with(always()).never();
        let usecase = LoginUseCase::new(registry.clone(), Arc::new(pusher));
        let (connection, _rx) = channel();

        // when (操作):
        let result = usecase
            .execute(SessionToken::generate(), &connection, "alice".to_string())
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), LoginError::NameTaken);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_login_empty_and_too_long_names() {
        // テスト項目: 空の名前と21文字の名前はそれぞれのエラーになる
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_reserved()
            .times(2)
            .returning(|_, _| Ok(()));
        pusher.expect_broadcast().never();
        let usecase = LoginUseCase::new(registry.clone(), Arc::new(pusher));
        let (connection, _rx) = channel();

        // when (操作):
        let empty = usecase
            .execute(SessionToken::generate(), &connection, String::new())
            .await;
        let too_long = usecase
            .execute(SessionToken::generate(), &connection, "x".repeat(21))
            .await;

        // then (期待する結果):
        assert_eq!(empty.unwrap_err(), LoginError::NameEmpty);
        assert_eq!(too_long.unwrap_err(), LoginError::NameTooLong);
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_login_reply_failure_still_registers() {
        // テスト項目: 応答の書き込みに失敗しても登録は行われる（切断検知は読み込みループの役割）
        let registry = Arc::new(InMemorySessionRegistry::new());
        let mut pusher = MockMessagePusher::new();
        pusher.expect_push_reserved().returning(|_, _| {
            Err(crate::domain::MessagePushError::PushFailed(
                "closed".to_string(),
            ))
        });
        pusher.expect_broadcast().times(2).returning(|_| 0);
        let usecase = LoginUseCase::new(registry.clone(), Arc::new(pusher));
        let (connection, _rx) = channel();

        let result = usecase
            .execute(SessionToken::generate(), &connection, "alice".to_string())
            .await;

        assert!(result.is_ok());
        assert_eq!(
            registry.snapshot_names().await,
            vec![DisplayName::new("alice".to_string()).unwrap()]
        );
    }
}
