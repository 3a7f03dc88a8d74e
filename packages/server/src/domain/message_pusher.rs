//! MessagePusher trait 定義
//!
//! Delivery abstraction used by the use cases. The implementation owns
//! encoding and the fan-out over the session registry.

use async_trait::async_trait;

use super::{
    error::MessagePushError,
    message::ServerMessage,
    transport::{ConnectionHandle, ReservedWrite},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Send one message to one connection.
    ///
    /// Writes are exclusive per connection, so this never interleaves with a
    /// concurrent broadcast to the same connection.
    async fn push_to(
        &self,
        connection: &ConnectionHandle,
        message: &ServerMessage,
    ) -> Result<(), MessagePushError>;

    /// Send one message through a connection whose write lock is already
    /// held, then release it.
    async fn push_reserved(
        &self,
        writer: ReservedWrite,
        message: &ServerMessage,
    ) -> Result<(), MessagePushError>;

    /// Send one message to every session registered at call time.
    ///
    /// A failed recipient is logged and skipped. Returns the number of
    /// sessions the message was delivered to.
    async fn broadcast(&self, message: &ServerMessage) -> usize;
}
