//! Conversion logic between domain messages and wire envelopes.

use crate::domain::{ChatEvent, LoginError, PostError, RosterError, ServerMessage};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain error → Status
// ========================================

impl From<LoginError> for dto::Status {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::NameTaken => Self::NameTaken,
            LoginError::NameEmpty => Self::NameEmpty,
            LoginError::NameTooLong => Self::NameTooLong,
        }
    }
}

impl From<PostError> for dto::Status {
    fn from(error: PostError) -> Self {
        match error {
            PostError::InvalidToken => Self::InvalidToken,
            PostError::MessageEmpty => Self::MessageEmpty,
            PostError::MessageTooLong => Self::MessageTooLong,
        }
    }
}

impl From<RosterError> for dto::Status {
    fn from(error: RosterError) -> Self {
        match error {
            RosterError::InvalidToken => Self::InvalidToken,
        }
    }
}

// ========================================
// Domain message → DTO
// ========================================

impl From<&ChatEvent> for dto::ChatMessage {
    fn from(event: &ChatEvent) -> Self {
        Self {
            r#type: dto::MessageType::ChatMessage,
            nickname: event.origin.as_ref().map(|name| name.as_str().to_string()),
            msg: event.body.clone(),
            is_system: event.is_system,
        }
    }
}

impl From<&ServerMessage> for dto::ServerEnvelope {
    fn from(message: &ServerMessage) -> Self {
        match message {
            ServerMessage::LoginResult(result) => Self::Login(dto::LoginResponse {
                r#type: dto::MessageType::LoginResponse,
                status: result.map_or_else(dto::Status::from, |_| dto::Status::Ok),
                token: result.as_ref().ok().map(ToString::to_string),
            }),
            ServerMessage::PostResult(result) => Self::PostMessage(dto::PostMessageResponse {
                r#type: dto::MessageType::PostMessageResponse,
                status: result.map_or_else(dto::Status::from, |()| dto::Status::Ok),
            }),
            ServerMessage::Chat(event) => Self::Chat(event.into()),
            ServerMessage::Roster(result) => Self::OnlineUsers(dto::OnlineUsersResponse {
                r#type: dto::MessageType::OnlineUsersResponse,
                status: result
                    .as_ref()
                    .map_or_else(|error| dto::Status::from(*error), |_| dto::Status::Ok),
                users: result
                    .as_ref()
                    .map(|names| names.iter().map(|name| name.as_str().to_string()).collect())
                    .unwrap_or_default(),
            }),
        }
    }
}
