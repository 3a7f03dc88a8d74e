//! Messages the relay sends to clients, in domain terms.
//!
//! The infrastructure layer turns these into wire envelopes.

use super::{
    entity::ChatEvent,
    error::{LoginError, PostError, RosterError},
    value_object::{DisplayName, SessionToken},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Reply to a login request; carries the token on success
    LoginResult(Result<SessionToken, LoginError>),
    /// Reply to a post request
    PostResult(Result<(), PostError>),
    /// A chat line fanned out to every logged in session
    Chat(ChatEvent),
    /// Roster reply, or a roster refresh when broadcast
    Roster(Result<Vec<DisplayName>, RosterError>),
}
