//! WebSocket wire envelopes.
//!
//! Every envelope is a JSON object with a numeric `type`. Inbound envelopes
//! are decoded in two steps: the `type` is read first, then the rest of the
//! object is decoded into the shape of that kind.

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Envelope kinds (the `type` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    LoginRequest = 1,
    LoginResponse = 2,
    PostMessageRequest = 3,
    PostMessageResponse = 4,
    ChatMessage = 5,
    OnlineUsersRequest = 6,
    OnlineUsersResponse = 7,
}

impl MessageType {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(Self::LoginRequest),
            2 => Some(Self::LoginResponse),
            3 => Some(Self::PostMessageRequest),
            4 => Some(Self::PostMessageResponse),
            5 => Some(Self::ChatMessage),
            6 => Some(Self::OnlineUsersRequest),
            7 => Some(Self::OnlineUsersResponse),
            _ => None,
        }
    }
}

impl Serialize for MessageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Response status codes (the `status` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 1,
    InvalidToken = 2,
    NameTaken = 3,
    NameEmpty = 4,
    NameTooLong = 5,
    MessageEmpty = 6,
    MessageTooLong = 7,
}

impl Status {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

// ========================================
// Client → Server
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostMessageRequest {
    pub token: String,
    pub msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OnlineUsersRequest {
    pub token: String,
}

/// A decoded client → server envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEnvelope {
    Login(LoginRequest),
    PostMessage(PostMessageRequest),
    OnlineUsers(OnlineUsersRequest),
}

/// Why an inbound envelope was dropped
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("envelope is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("envelope is not a JSON object")]
    NotAnObject,

    #[error("envelope has no numeric type")]
    MissingType,

    /// Unknown code, or a server → client kind sent by a client
    #[error("unknown envelope type {0}")]
    UnknownType(u64),

    #[error("invalid {kind:?} envelope: {source}")]
    InvalidBody {
        kind: MessageType,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientEnvelope {
    /// Decode one text frame.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(DecodeError::Malformed)?;
        let object = value.as_object().ok_or(DecodeError::NotAnObject)?;
        let code = object
            .get("type")
            .and_then(type_code)
            .ok_or(DecodeError::MissingType)?;

        let kind = match MessageType::from_code(code) {
            Some(
                kind @ (MessageType::LoginRequest
                | MessageType::PostMessageRequest
                | MessageType::OnlineUsersRequest),
            ) => kind,
            _ => return Err(DecodeError::UnknownType(code)),
        };

        let invalid = |source| DecodeError::InvalidBody { kind, source };
        match kind {
            MessageType::LoginRequest => serde_json::from_value(value)
                .map(Self::Login)
                .map_err(invalid),
            MessageType::PostMessageRequest => serde_json::from_value(value)
                .map(Self::PostMessage)
                .map_err(invalid),
            _ => serde_json::from_value(value)
                .map(Self::OnlineUsers)
                .map_err(invalid),
        }
    }

    pub fn kind(&self) -> MessageType {
        match self {
            Self::Login(_) => MessageType::LoginRequest,
            Self::PostMessage(_) => MessageType::PostMessageRequest,
            Self::OnlineUsers(_) => MessageType::OnlineUsersRequest,
        }
    }
}

/// Accept integral JSON numbers, including ones written as `1.0`.
fn type_code(value: &serde_json::Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
            .map(|f| f as u64)
    })
}

// ========================================
// Server → Client
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub r#type: MessageType,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMessageResponse {
    pub r#type: MessageType,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub r#type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub msg: String,
    #[serde(rename = "isSystem")]
    pub is_system: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnlineUsersResponse {
    pub r#type: MessageType,
    pub status: Status,
    pub users: Vec<String>,
}

/// Any server → client envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServerEnvelope {
    Login(LoginResponse),
    PostMessage(PostMessageResponse),
    Chat(ChatMessage),
    OnlineUsers(OnlineUsersResponse),
}

impl ServerEnvelope {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
