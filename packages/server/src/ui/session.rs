//! Connection session: the per-connection read loop and its lifecycle.
//!
//! ```text
//! Anonymous --login ok--> Authenticated --login ok--> Authenticated
//!     |                        |
//!     +---- transport closed / error ----+--> Closed
//! ```
//!
//! Frames are handled strictly in arrival order. Only the transport ends a
//! session; decode and validation failures never do.

use std::{fmt::Display, net::SocketAddr, sync::Arc};

use futures_util::{Stream, StreamExt};

use crate::{
    domain::{ConnectionHandle, DisplayName, SessionToken},
    ui::{
        dispatcher::{DispatchOutcome, Dispatcher},
        state::AppState,
    },
};

/// Transport-neutral view of one inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Text(String),
    /// The peer asked to close
    Close,
    /// Binary, ping and pong frames
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated { display_name: DisplayName },
    Closed,
}

pub struct ConnectionSession {
    dispatcher: Dispatcher,
    state: SessionState,
    addr: Option<SocketAddr>,
}

impl ConnectionSession {
    /// Start a session in the `Anonymous` state.
    pub fn new(
        app_state: Arc<AppState>,
        token: SessionToken,
        connection: ConnectionHandle,
        addr: Option<SocketAddr>,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(app_state, token, connection, addr),
            state: SessionState::Anonymous,
            addr,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn token(&self) -> &SessionToken {
        self.dispatcher.token()
    }

    /// Read and dispatch frames until the transport closes or fails, then
    /// run disconnect cleanup. Returns the terminal state.
    pub async fn run<S, E>(mut self, mut inbound: S) -> SessionState
    where
        S: Stream<Item = Result<InboundFrame, E>> + Unpin,
        E: Display,
    {
        while let Some(frame) = inbound.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!(token = %self.token(), addr = ?self.addr, "Read from connection: {}", e);
                    break;
                }
            };

            match frame {
                InboundFrame::Text(text) => self.handle_text(&text).await,
                InboundFrame::Close => {
                    tracing::debug!(token = %self.token(), "Client requested close");
                    break;
                }
                InboundFrame::Other => {
                    tracing::trace!(token = %self.token(), "Ignoring non-text frame");
                }
            }
        }

        self.close().await;
        self.state
    }

    async fn handle_text(&mut self, text: &str) {
        if let DispatchOutcome::LoggedIn(display_name) = self.dispatcher.dispatch(text).await {
            self.state = SessionState::Authenticated { display_name };
        }
    }

    async fn close(&mut self) {
        let previous = std::mem::replace(&mut self.state, SessionState::Closed);
        let name = match &previous {
            SessionState::Authenticated { display_name } => Some(display_name.as_str()),
            SessionState::Anonymous | SessionState::Closed => None,
        };
        tracing::info!(
            token = %self.token(),
            name = name.unwrap_or_default(),
            addr = ?self.addr,
            "Client disconnected"
        );

        if let SessionState::Authenticated { .. } = previous {
            self.dispatcher
                .state()
                .disconnect_usecase
                .execute(self.dispatcher.token())
                .await;
        }
    }
}
