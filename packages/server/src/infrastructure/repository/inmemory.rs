//! InMemory SessionRegistry 実装
//!
//! ドメイン層が定義する SessionRegistry trait の具体的な実装。
//! `RwLock<HashMap>` をインメモリ DB として使用します。
//! Readers (lookups, snapshots) run concurrently; every mutation takes the
//! write lock, which is what makes login's check-and-insert atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    ConnectedIdentity, ConnectionHandle, DisplayName, LoginError, SessionRegistry, SessionToken,
};

/// インメモリ SessionRegistry 実装
#[derive(Default)]
pub struct InMemorySessionRegistry {
    /// Key: session token, Value: the logged in identity
    sessions: RwLock<HashMap<SessionToken, ConnectedIdentity>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

fn name_in_use(sessions: &HashMap<SessionToken, ConnectedIdentity>, name: &str) -> bool {
    sessions
        .values()
        .any(|identity| identity.display_name.as_str() == name)
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn try_register(
        &self,
        token: SessionToken,
        display_name: String,
        connection: ConnectionHandle,
    ) -> Result<ConnectedIdentity, LoginError> {
        let mut sessions = self.sessions.write().await;

        if name_in_use(&sessions, &display_name) {
            return Err(LoginError::NameTaken);
        }
        let display_name = DisplayName::new(display_name)?;

        let identity = ConnectedIdentity::new(token, display_name, connection);
        if let Some(previous) = sessions.insert(token, identity.clone()) {
            tracing::debug!(
                token = %token,
                previous = %previous.display_name,
                name = %identity.display_name,
                "Session re-registered under a new name"
            );
        }
        Ok(identity)
    }

    async fn register(&self, identity: ConnectedIdentity) -> Option<ConnectedIdentity> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(identity.token, identity)
    }

    async fn unregister(&self, token: &SessionToken) -> Option<ConnectedIdentity> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token)
    }

    async fn lookup(&self, token: &SessionToken) -> Option<ConnectedIdentity> {
        let sessions = self.sessions.read().await;
        sessions.get(token).cloned()
    }

    async fn has_name(&self, name: &str) -> bool {
        let sessions = self.sessions.read().await;
        name_in_use(&sessions, name)
    }

    async fn snapshot_names(&self) -> Vec<DisplayName> {
        let sessions = self.sessions.read().await;
        let mut names: Vec<DisplayName> = sessions
            .values()
            .map(|identity| identity.display_name.clone())
            .collect();

        // Sort by name for consistent ordering
        names.sort();
        names
    }

    async fn snapshot(&self) -> Vec<ConnectedIdentity> {
        let sessions = self.sessions.read().await;
        sessions.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - try_register の検証順序（名前重複 → 空 → 長すぎ）
    // - 同名ログインが並行しても1つしか成功しないこと
    // - unregister / lookup / snapshot_names の整合性
    // ========================================

    fn connection() -> ConnectionHandle {
        let (tx, _rx) = mpsc::unbounded_channel::<String>();
        ConnectionHandle::new(tx)
    }

    #[tokio::test]
    async fn test_try_register_success() {
        // テスト項目: 新しい名前で登録できる
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let token = SessionToken::generate();

        // when (操作):
        let result = registry
            .try_register(token, "alice".to_string(), connection())
            .await;

        // then (期待する結果):
        let identity = result.unwrap();
        assert_eq!(identity.token, token);
        assert_eq!(identity.display_name.as_str(), "alice");
        assert!(registry.has_name("alice").await);
        assert!(!registry.has_name("Alice").await);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_try_register_validation_order() {
        // テスト項目: 名前重複・空・長すぎがそれぞれのエラーになる
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        registry
            .try_register(SessionToken::generate(), "alice".to_string(), connection())
            .await
            .unwrap();

        // when / then:
        assert_eq!(
            registry
                .try_register(SessionToken::generate(), "alice".to_string(), connection())
                .await
                .unwrap_err(),
            LoginError::NameTaken
        );
        assert_eq!(
            registry
                .try_register(SessionToken::generate(), String::new(), connection())
                .await
                .unwrap_err(),
            LoginError::NameEmpty
        );
        assert_eq!(
            registry
                .try_register(SessionToken::generate(), "a".repeat(21), connection())
                .await
                .unwrap_err(),
            LoginError::NameTooLong
        );
        assert!(
            registry
                .try_register(SessionToken::generate(), "b".repeat(20), connection())
                .await
                .is_ok()
        );

        // 失敗したログインは何も登録しない
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logins_with_same_name() {
        // テスト項目: 同名で並行ログインした場合、ちょうど1つだけ成功する
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());

        // when (操作): 16 タスクが同時に "alice" でログイン
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry
                    .try_register(SessionToken::generate(), "alice".to_string(), connection())
                    .await
            }));
        }
        let mut succeeded = 0;
        let mut taken = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(LoginError::NameTaken) => taken += 1,
                Err(other) => panic!("unexpected login error: {other:?}"),
            }
        }

        // then (期待する結果):
        assert_eq!(succeeded, 1);
        assert_eq!(taken, 15);
        let names = registry.snapshot_names().await;
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].as_str(), "alice");
    }

    #[tokio::test]
    async fn test_unregister_removes_name() {
        // テスト項目: 切断後は参加者一覧から名前が消える
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let token = SessionToken::generate();
        registry
            .try_register(token, "alice".to_string(), connection())
            .await
            .unwrap();

        // when (操作):
        let removed = registry.unregister(&token).await;

        // then (期待する結果):
        assert_eq!(removed.unwrap().display_name.as_str(), "alice");
        assert!(registry.lookup(&token).await.is_none());
        assert!(registry.snapshot_names().await.is_empty());
        assert!(registry.unregister(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_re_register_replaces_entry_for_token() {
        // テスト項目: 同じトークンで別名登録すると古いエントリが置き換わる
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let token = SessionToken::generate();
        registry
            .try_register(token, "alice".to_string(), connection())
            .await
            .unwrap();

        // when (操作):
        registry
            .try_register(token, "alicia".to_string(), connection())
            .await
            .unwrap();

        // then (期待する結果): トークン1つにつき1エントリ
        let names = registry.snapshot_names().await;
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].as_str(), "alicia");
    }

    #[tokio::test]
    async fn test_snapshot_names_sorted() {
        // テスト項目: 参加者名は名前順に並ぶ
        let registry = InMemorySessionRegistry::new();
        for name in ["charlie", "alice", "bob"] {
            let identity = ConnectedIdentity::new(
                SessionToken::generate(),
                DisplayName::new(name.to_string()).unwrap(),
                connection(),
            );
            assert!(registry.register(identity).await.is_none());
        }

        let names: Vec<String> = registry
            .snapshot_names()
            .await
            .into_iter()
            .map(DisplayName::into_string)
            .collect();

        assert_eq!(names, vec!["alice", "bob", "charlie"]);
        assert_eq!(registry.snapshot().await.len(), 3);
    }
}
