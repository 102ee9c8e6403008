//! Error types for the socket HTTP client.
//!
//! # Design
//! Three failure classes reach the caller: the URL could not be understood,
//! the socket could not carry the exchange, or the bytes that came back are
//! not an HTTP response. Nothing is retried and no partial result is returned.
//! Undecodable response bytes are not an error; the transport falls back to
//! Latin-1 instead.

use std::io;

/// Errors returned by `HttpClient` and the component functions it composes.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The URL has no usable scheme, host or port.
    #[error("invalid uri: {0}")]
    InvalidUri(String),

    /// Connect, write or read failed on the socket (including timeouts).
    #[error("connection error: {0}")]
    Connection(#[source] io::Error),

    /// The status line or the header/body separator is missing or unparseable.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        ClientError::Connection(err)
    }
}
