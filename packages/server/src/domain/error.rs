//! Domain error types.
//!
//! Login, post and roster failures are ordinary outcomes that the client
//! receives as a status code. None of them terminates a connection.

use thiserror::Error;

/// Display name validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DisplayNameError {
    #[error("display name is empty")]
    Empty,

    #[error("display name is too long")]
    TooLong,
}

/// Message body validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MessageBodyError {
    #[error("message is empty")]
    Empty,

    #[error("message is too long")]
    TooLong,
}

/// Login rejections, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("display name is already taken")]
    NameTaken,

    #[error("display name is empty")]
    NameEmpty,

    #[error("display name is too long")]
    NameTooLong,
}

impl From<DisplayNameError> for LoginError {
    fn from(error: DisplayNameError) -> Self {
        match error {
            DisplayNameError::Empty => Self::NameEmpty,
            DisplayNameError::TooLong => Self::NameTooLong,
        }
    }
}

/// Post rejections, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PostError {
    #[error("session token is invalid")]
    InvalidToken,

    #[error("message is empty")]
    MessageEmpty,

    #[error("message is too long")]
    MessageTooLong,
}

impl From<MessageBodyError> for PostError {
    fn from(error: MessageBodyError) -> Self {
        match error {
            MessageBodyError::Empty => Self::MessageEmpty,
            MessageBodyError::TooLong => Self::MessageTooLong,
        }
    }
}

/// Roster query rejections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("session token is invalid")]
    InvalidToken,
}

/// Delivery errors
#[derive(Debug, Error)]
pub enum MessagePushError {
    /// The message could not be encoded for the wire
    #[error("failed to encode message: {0}")]
    Encode(String),

    /// The transport rejected the write
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
