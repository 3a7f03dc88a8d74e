//! Value objects of the relay domain.

use std::fmt;

use uuid::Uuid;

use super::error::{DisplayNameError, MessageBodyError};

/// Maximum length of a display name, in characters.
pub const MAX_DISPLAY_NAME_CHARS: usize = 20;

/// Maximum length of a user-posted message body, in characters.
pub const MAX_MESSAGE_BODY_CHARS: usize = 2000;

/// Opaque per-connection credential.
///
/// Generated when a connection is accepted and never reused. It is only sent
/// to the client after a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// Generate a fresh random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Whether a token presented by a client is exactly the string this
    /// token was issued as.
    ///
    /// Other spellings of the same UUID (upper case, braces, `urn:uuid:`,
    /// no hyphens, surrounding whitespace) do not match.
    pub fn matches(&self, presented: &str) -> bool {
        let mut buffer = Uuid::encode_buffer();
        *presented == *self.0.hyphenated().encode_lower(&mut buffer)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name of a logged in user: non-empty, at most
/// [`MAX_DISPLAY_NAME_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, DisplayNameError> {
        if value.is_empty() {
            return Err(DisplayNameError::Empty);
        }
        if value.chars().count() > MAX_DISPLAY_NAME_CHARS {
            return Err(DisplayNameError::TooLong);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a user-posted chat message: non-empty, at most
/// [`MAX_MESSAGE_BODY_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn new(value: String) -> Result<Self, MessageBodyError> {
        if value.is_empty() {
            return Err(MessageBodyError::Empty);
        }
        if value.chars().count() > MAX_MESSAGE_BODY_CHARS {
            return Err(MessageBodyError::TooLong);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
