//! Kaiwa chat relay.
//!
//! Accepts WebSocket connections, issues each one a session token, keeps the
//! registry of who is online and fans chat events out to every logged in
//! session.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
