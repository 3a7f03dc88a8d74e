//! Envelope dispatcher.
//!
//! Decodes one inbound text frame and routes it to exactly one use case.
//! Nothing here can end a session: undecodable frames and unknown kinds are
//! logged and dropped, and validation failures are already answered by the
//! use cases with a status code.

use std::{net::SocketAddr, sync::Arc};

use crate::{
    domain::{ConnectionHandle, DisplayName, SessionToken},
    infrastructure::dto::websocket::{ClientEnvelope, DecodeError},
    ui::state::AppState,
};

/// What a dispatched frame did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A login succeeded; the session is now authenticated as this name
    LoggedIn(DisplayName),
    /// The request was answered (successfully or with a failure status)
    Handled,
    /// Unknown kind; no reply, no state change
    Ignored,
    /// The frame could not be decoded
    Dropped,
}

/// Per-connection view of the request handlers
pub struct Dispatcher {
    state: Arc<AppState>,
    token: SessionToken,
    connection: ConnectionHandle,
    addr: Option<SocketAddr>,
}

impl Dispatcher {
    pub fn new(
        state: Arc<AppState>,
        token: SessionToken,
        connection: ConnectionHandle,
        addr: Option<SocketAddr>,
    ) -> Self {
        Self {
            state,
            token,
            connection,
            addr,
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Decode and handle one text frame.
    pub async fn dispatch(&self, text: &str) -> DispatchOutcome {
        let envelope = match ClientEnvelope::decode(text) {
            Ok(envelope) => envelope,
            Err(DecodeError::UnknownType(code)) => {
                tracing::warn!(
                    token = %self.token,
                    addr = ?self.addr,
                    code,
                    "Received unknown request"
                );
                return DispatchOutcome::Ignored;
            }
            Err(e) => {
                tracing::error!(token = %self.token, addr = ?self.addr, "Decode request: {}", e);
                return DispatchOutcome::Dropped;
            }
        };

        tracing::debug!(
            token = %self.token,
            addr = ?self.addr,
            kind = ?envelope.kind(),
            "Received request"
        );

        match envelope {
            ClientEnvelope::Login(request) => self
                .state
                .login_usecase
                .execute(self.token, &self.connection, request.nickname)
                .await
                .map_or(DispatchOutcome::Handled, |identity| {
                    DispatchOutcome::LoggedIn(identity.display_name)
                }),
            ClientEnvelope::PostMessage(request) => {
                if let Err(e) = self
                    .state
                    .post_message_usecase
                    .execute(&self.token, &self.connection, &request.token, request.msg)
                    .await
                {
                    tracing::debug!(token = %self.token, "Post rejected: {}", e);
                }
                DispatchOutcome::Handled
            }
            ClientEnvelope::OnlineUsers(request) => {
                if let Err(e) = self
                    .state
                    .list_users_usecase
                    .execute(&self.token, &self.connection, &request.token)
                    .await
                {
                    tracing::debug!(token = %self.token, "Online users request rejected: {}", e);
                }
                DispatchOutcome::Handled
            }
        }
    }
}
