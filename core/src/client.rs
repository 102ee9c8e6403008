//! Blocking HTTP/1.1 client over a raw TCP socket.
//!
//! # Design
//! `HttpClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Every call walks the same pipeline: decompose the URL,
//! build the request, exchange it over a fresh socket, decode, parse. The
//! socket is created and released inside `transport::exchange`, so nothing
//! is left open when a call returns, whether it succeeded or not.

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::request::{self, Method, Payload};
use crate::response::{self, Response};
use crate::transport;
use crate::uri::ParsedUri;

/// Synchronous client issuing one request per socket.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue a GET request for `url`.
    pub fn get(&self, url: &str) -> Result<Response, ClientError> {
        self.request(Method::Get, url, None)
    }

    /// Issue a POST request for `url` with an optional payload.
    ///
    /// When `echo_post_response` is set, the raw response is printed to
    /// stdout as `Result: ...` before it is parsed.
    pub fn post(&self, url: &str, payload: Option<&Payload>) -> Result<Response, ClientError> {
        self.request(Method::Post, url, payload)
    }

    /// Issue a request with `method`. Use `Method::from_name` to dispatch on
    /// a method string; unknown names become GET.
    pub fn request(
        &self,
        method: Method,
        url: &str,
        payload: Option<&Payload>,
    ) -> Result<Response, ClientError> {
        let uri = ParsedUri::parse(url)?;
        let req = request::build(method, &uri, payload);
        debug!(%method, host = %uri.host, port = uri.port, target = %req.target, "sending request");

        let raw = transport::exchange(&uri.host, uri.port, &req.to_bytes(), &self.config)?;
        let text = transport::decode_text(raw);

        if method == Method::Post && self.config.echo_post_response {
            println!("Result: {text}");
        }

        response::parse_with(&text, self.config.body_mode)
    }
}
