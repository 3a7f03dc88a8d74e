//! Domain entities.

use chrono::{DateTime, Utc};

use super::{
    transport::ConnectionHandle,
    value_object::{DisplayName, MessageBody, SessionToken},
};

/// A logged in session: token, display name and the connection it talks on.
#[derive(Debug, Clone)]
pub struct ConnectedIdentity {
    pub token: SessionToken,
    pub display_name: DisplayName,
    pub connection: ConnectionHandle,
    pub logged_in_at: DateTime<Utc>,
}

impl ConnectedIdentity {
    pub fn new(token: SessionToken, display_name: DisplayName, connection: ConnectionHandle) -> Self {
        Self {
            token,
            display_name,
            connection,
            logged_in_at: Utc::now(),
        }
    }
}

/// A broadcastable chat line: either a user post or a system notice.
///
/// Never stored; it only lives for the duration of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    /// Poster's name, `None` for system notices
    pub origin: Option<DisplayName>,
    pub body: String,
    pub is_system: bool,
}

impl ChatEvent {
    /// A message posted by a user
    pub fn user(origin: DisplayName, body: MessageBody) -> Self {
        Self {
            origin: Some(origin),
            body: body.into_string(),
            is_system: false,
        }
    }

    /// System notice that `name` logged in
    pub fn joined(name: &DisplayName) -> Self {
        Self::system(format!("{name} joined the chat"))
    }

    /// System notice that `name` disconnected
    pub fn left(name: &DisplayName) -> Self {
        Self::system(format!("{name} left the chat"))
    }

    fn system(body: String) -> Self {
        Self {
            origin: None,
            body,
            is_system: true,
        }
    }
}
