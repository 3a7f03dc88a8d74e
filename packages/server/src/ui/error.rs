//! Startup errors.
//!
//! These are the only fatal conditions; everything after the listener is up
//! is contained per connection.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind '{address}': {source}")]
    Bind { address: String, source: io::Error },

    #[error("failed to read TLS file '{path}': {source}")]
    TlsFile { path: PathBuf, source: io::Error },

    #[error("invalid TLS configuration: {0}")]
    TlsConfig(String),

    #[error("server error: {0}")]
    Serve(#[from] io::Error),
}
