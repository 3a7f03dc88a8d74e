//! SessionRegistry trait 定義
//!
//! The registry is the single source of truth for who is online. Use cases
//! depend on this trait; the infrastructure layer provides the storage.

use async_trait::async_trait;

use super::{
    entity::ConnectedIdentity,
    error::LoginError,
    transport::ConnectionHandle,
    value_object::{DisplayName, SessionToken},
};

#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Validate `display_name` and register it for `token` in one atomic step.
    ///
    /// Checks run in this order: name taken, name empty, name too long.
    /// No other login can register the same name between the check and the
    /// insert. An existing entry for `token` is replaced.
    async fn try_register(
        &self,
        token: SessionToken,
        display_name: String,
        connection: ConnectionHandle,
    ) -> Result<ConnectedIdentity, LoginError>;

    /// Insert an already validated identity, replacing any entry for its
    /// token. Returns the replaced entry.
    async fn register(&self, identity: ConnectedIdentity) -> Option<ConnectedIdentity>;

    /// Remove the entry for `token`, returning it if present
    async fn unregister(&self, token: &SessionToken) -> Option<ConnectedIdentity>;

    async fn lookup(&self, token: &SessionToken) -> Option<ConnectedIdentity>;

    /// Whether any registered identity uses `name` (case-sensitive)
    async fn has_name(&self, name: &str) -> bool;

    /// Display names of every registered identity
    async fn snapshot_names(&self) -> Vec<DisplayName>;

    /// Every registered identity at call time
    async fn snapshot(&self) -> Vec<ConnectedIdentity>;

    async fn count(&self) -> usize;
}
