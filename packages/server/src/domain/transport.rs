//! Outbound transport abstraction.
//!
//! Every connection gets exactly one [`ConnectionHandle`]. The handle owns the
//! write half of the transport behind its own lock, so direct replies and
//! broadcasts to that connection are written one whole message at a time
//! while unrelated connections are written in parallel.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::error::MessagePushError;

/// Write half of a client transport
#[async_trait]
pub trait OutboundSink: Send {
    /// Write one complete text message.
    async fn send_text(&mut self, text: String) -> Result<(), MessagePushError>;
}

/// Shared, cloneable handle to one connection's write half.
#[derive(Clone)]
pub struct ConnectionHandle {
    sink: Arc<Mutex<Box<dyn OutboundSink>>>,
}

impl ConnectionHandle {
    pub fn new(sink: impl OutboundSink + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    /// Write one message while holding this connection's write lock.
    pub async fn send_text(&self, text: String) -> Result<(), MessagePushError> {
        let mut sink = self.sink.lock().await;
        sink.send_text(text).await
    }

    /// Take this connection's write lock now and keep it until the
    /// returned reservation writes its message.
    pub async fn reserve(&self) -> ReservedWrite {
        ReservedWrite {
            sink: self.sink.clone().lock_owned().await,
        }
    }
}

/// Held write lock of one connection
///
/// Every other writer to the connection waits until [`ReservedWrite::send_text`]
/// has written and released it.
pub struct ReservedWrite {
    sink: OwnedMutexGuard<Box<dyn OutboundSink>>,
}

impl ReservedWrite {
    /// Write one message, then release the connection.
    pub async fn send_text(mut self, text: String) -> Result<(), MessagePushError> {
        self.sink.send_text(text).await
    }
}

impl fmt::Debug for ReservedWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReservedWrite").finish_non_exhaustive()
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("sink", &Arc::as_ptr(&self.sink))
            .finish()
    }
}
