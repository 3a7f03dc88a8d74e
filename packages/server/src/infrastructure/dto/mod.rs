//! Data Transfer Objects (DTOs) for the chat relay.
//!
//! - `websocket`: wire envelopes and the inbound decoder
//! - `conversion`: domain messages to outbound envelopes

pub mod conversion;
pub mod websocket;
