//! Minimal blocking HTTP/1.1 client built on raw TCP sockets.
//!
//! # Overview
//! Issues one GET or POST per call over a fresh `TcpStream`, reads the
//! response until the peer closes, and returns the status code and body.
//! No HTTP library is involved; request bytes are assembled by hand and the
//! response is parsed from the raw stream.
//!
//! # Design
//! - `uri` splits the URL, `request` builds the wire bytes, `transport` owns
//!   the socket, `response` parses the reply. `HttpClient` composes them.
//! - `HttpClient` holds only its `ClientConfig`; the socket lives for one
//!   call and is threaded explicitly through `transport::exchange`.
//! - POST bodies are a tagged `Payload` (`Form` or `Raw`) chosen by the
//!   caller.
//! - Plain HTTP only. No TLS, chunked decoding, redirects or keep-alive.

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;
pub mod uri;

pub use client::HttpClient;
pub use config::{BodyMode, ClientConfig};
pub use error::ClientError;
pub use request::{HttpRequest, Method, Payload};
pub use response::Response;
pub use uri::{decompose, ParsedUri};
