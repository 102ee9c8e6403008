//! Client configuration.

use std::time::Duration;

/// Bytes requested per `read` call when draining the socket.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// How much of the response follows the header/body separator into
/// `Response::body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMode {
    /// Only the single `\r\n`-delimited line after the separator.
    #[default]
    FirstLine,
    /// Everything after the separator.
    Full,
}

/// Settings for `HttpClient`.
///
/// The defaults match the plain blocking behavior: no timeouts, 1 KiB reads,
/// first-line bodies, and the raw POST response echoed to stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub read_chunk_size: usize,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub body_mode: BodyMode,
    pub echo_post_response: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            connect_timeout: None,
            read_timeout: None,
            body_mode: BodyMode::FirstLine,
            echo_post_response: true,
        }
    }
}

impl ClientConfig {
    /// Set the read chunk size. Zero is raised to one byte.
    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size.max(1);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn with_body_mode(mut self, mode: BodyMode) -> Self {
        self.body_mode = mode;
        self
    }

    pub fn with_echo_post_response(mut self, echo: bool) -> Self {
        self.echo_post_response = echo;
        self
    }
}
