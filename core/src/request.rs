//! HTTP/1.1 request construction.
//!
//! # Design
//! `build` produces an `HttpRequest` as plain data (method, target, ordered
//! headers, body bytes) and `HttpRequest::to_bytes` serializes it into the
//! exact byte sequence written to the socket. Keeping the two steps apart
//! lets tests inspect headers without re-parsing the wire format.
//!
//! Header values are written verbatim. A `\r\n` inside a URI component or a
//! payload value ends up on the wire unchanged.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::uri::ParsedUri;

/// Content type sent with every POST.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    /// Map a method name to a `Method`. `POST` (any case) selects `Post`;
    /// every other name falls back to `Get`.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("POST") {
            Method::Post
        } else {
            Method::Get
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body arguments for a POST request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// Form fields, encoded as `key=value` pairs joined by `&` in key order.
    Form(BTreeMap<String, String>),
    /// A body sent exactly as given.
    Raw(String),
}

impl Payload {
    /// Build a `Form` payload from any iterator of key/value pairs.
    pub fn form<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Payload::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a `Raw` payload from anything displayable, numbers included.
    pub fn raw(value: impl ToString) -> Self {
        Payload::Raw(value.to_string())
    }

    /// Encode the payload into body text.
    pub fn encode(&self) -> String {
        match self {
            Payload::Form(fields) => fields
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&"),
            Payload::Raw(body) => body.clone(),
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// First header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serialize into the bytes written to the socket: request line, one
    /// line per header, an empty line, then the body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("{} {} HTTP/1.1\r\n", self.method, self.target);
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

/// Build the request for `method` against `uri`.
///
/// GET never carries a body, so `payload` is ignored for it. POST always
/// sends the form content type, and its body is the encoded payload (empty
/// when `payload` is `None`).
pub fn build(method: Method, uri: &ParsedUri, payload: Option<&Payload>) -> HttpRequest {
    let body = match (method, payload) {
        (Method::Post, Some(payload)) => payload.encode().into_bytes(),
        _ => Vec::new(),
    };

    let mut headers = vec![
        ("Host".to_string(), uri.host_header()),
        ("Accept".to_string(), "*/*".to_string()),
    ];
    match method {
        Method::Get => headers.push(("Accept-Encoding".to_string(), "gzip".to_string())),
        Method::Post => headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())),
    }
    headers.push(("Connection".to_string(), "close".to_string()));
    headers.push(("Content-Length".to_string(), body.len().to_string()));

    HttpRequest {
        method,
        target: uri.target(),
        headers,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uri::decompose;

    fn text(req: &HttpRequest) -> String {
        String::from_utf8(req.to_bytes()).unwrap()
    }

    #[test]
    fn method_from_name_defaults_to_get() {
        assert_eq!(Method::from_name("POST"), Method::Post);
        assert_eq!(Method::from_name("post"), Method::Post);
        assert_eq!(Method::from_name("GET"), Method::Get);
        assert_eq!(Method::from_name("DELETE"), Method::Get);
        assert_eq!(Method::from_name(""), Method::Get);
    }

    #[test]
    fn get_request_wire_format() {
        let uri = decompose("http://example.com/foo").unwrap();
        let req = build(Method::Get, &uri, None);
        assert_eq!(
            text(&req),
            "GET /foo HTTP/1.1\r\n\
             Host: example.com\r\n\
             Accept: */*\r\n\
             Accept-Encoding: gzip\r\n\
             Connection: close\r\n\
             Content-Length: 0\r\n\
             \r\n"
        );
    }

    #[test]
    fn get_ignores_payload() {
        let uri = decompose("http://example.com/").unwrap();
        let req = build(Method::Get, &uri, Some(&Payload::raw("ignored")));
        assert!(req.body.is_empty());
        assert_eq!(req.header("content-length"), Some("0"));
    }

    #[test]
    fn host_header_excludes_port() {
        let uri = decompose("http://localhost:8080/").unwrap();
        let req = build(Method::Get, &uri, None);
        assert_eq!(req.header("Host"), Some("localhost"));
    }

    #[test]
    fn post_form_sorted_keys() {
        let uri = decompose("http://example.com/submit").unwrap();
        let payload = Payload::form([("b", "2"), ("a", "1")]);
        let req = build(Method::Post, &uri, Some(&payload));
        assert_eq!(req.body, b"a=1&b=2");
        assert_eq!(req.header("Content-Length"), Some("7"));
        assert_eq!(req.header("Content-Type"), Some(FORM_CONTENT_TYPE));
        assert!(text(&req).ends_with("\r\n\r\na=1&b=2"));
    }

    #[test]
    fn post_header_order() {
        let uri = decompose("http://example.com/submit").unwrap();
        let req = build(Method::Post, &uri, None);
        let names: Vec<&str> = req.headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            ["Host", "Accept", "Content-Type", "Connection", "Content-Length"]
        );
        assert_eq!(req.header("Content-Length"), Some("0"));
        assert!(req.header("Accept-Encoding").is_none());
    }

    #[test]
    fn post_raw_and_numeric_bodies() {
        let uri = decompose("http://example.com/").unwrap();

        let req = build(Method::Post, &uri, Some(&Payload::raw("hello world")));
        assert_eq!(req.body, b"hello world");
        assert_eq!(req.header("Content-Length"), Some("11"));

        let req = build(Method::Post, &uri, Some(&Payload::raw(42)));
        assert_eq!(req.body, b"42");

        let req = build(Method::Post, &uri, Some(&Payload::raw(1.5)));
        assert_eq!(req.body, b"1.5");
    }

    #[test]
    fn content_length_counts_bytes_not_chars() {
        let uri = decompose("http://example.com/").unwrap();
        let req = build(Method::Post, &uri, Some(&Payload::raw("héllo")));
        assert_eq!(req.header("Content-Length"), Some("6"));
    }

    #[test]
    fn empty_form_has_empty_body() {
        let uri = decompose("http://example.com/").unwrap();
        let payload = Payload::form(Vec::<(String, String)>::new());
        let req = build(Method::Post, &uri, Some(&payload));
        assert!(req.body.is_empty());
        assert_eq!(req.header("Content-Length"), Some("0"));
    }

    #[test]
    fn target_carries_query() {
        let uri = decompose("http://example.com/search?q=rust").unwrap();
        let req = build(Method::Get, &uri, None);
        assert!(text(&req).starts_with("GET /search?q=rust HTTP/1.1\r\n"));
    }
}
