//! Parsing of a raw HTTP/1.1 response into status code, headers and body.
//!
//! The response is handled as text split on `\r\n`. The header/body separator
//! is the first line that is exactly empty. In `BodyMode::FirstLine` the body
//! is the single line following it, so a body containing `\r\n` is truncated
//! to its first line.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BodyMode;
use crate::error::ClientError;

/// The result of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status_code: u16,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    /// First header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Parse `raw` keeping only the first body line.
///
/// # Errors
///
/// Returns `ClientError::MalformedResponse` if the status line has no numeric
/// status code or there is no blank line followed by a body line.
pub fn parse(raw: &str) -> Result<Response, ClientError> {
    parse_with(raw, BodyMode::FirstLine)
}

/// Parse `raw`, extracting the body according to `mode`.
pub fn parse_with(raw: &str, mode: BodyMode) -> Result<Response, ClientError> {
    let lines: Vec<&str> = raw.split("\r\n").collect();

    let status_code = status_code(lines[0])?;

    let separator = lines
        .iter()
        .position(|line| line.is_empty())
        .ok_or_else(|| malformed("no blank line between headers and body"))?;
    let first_body_line = lines
        .get(separator + 1)
        .ok_or_else(|| malformed("nothing follows the header/body separator"))?;

    let headers = lines[1..separator]
        .iter()
        .map(|line| match line.split_once(':') {
            Some((name, value)) => (name.trim().to_string(), value.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        })
        .collect();

    let body = match mode {
        BodyMode::FirstLine => first_body_line.to_string(),
        BodyMode::Full => lines[separator + 1..].join("\r\n"),
    };

    debug!(status_code, body_len = body.len(), "parsed response");
    Ok(Response {
        status_code,
        headers,
        body,
    })
}

/// Extract the status code from a status line such as `HTTP/1.1 200 OK`.
fn status_code(status_line: &str) -> Result<u16, ClientError> {
    let token = status_line
        .split(' ')
        .nth(1)
        .ok_or_else(|| malformed(&format!("no status code in {status_line:?}")))?;
    if token.len() != 3 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(&format!("status code {token:?} is not three digits")));
    }
    token
        .parse()
        .map_err(|_| malformed(&format!("status code {token:?} is not a number")))
}

fn malformed(reason: &str) -> ClientError {
    ClientError::MalformedResponse(reason.to_string())
}
