//! URI decomposition into the pieces a raw HTTP/1.1 request needs.
//!
//! Only `http://` URLs are accepted: there is no TLS layer underneath, so an
//! `https://` URL could never be served correctly over the plain socket.

use crate::error::ClientError;

/// Port used when the authority carries none.
pub const DEFAULT_PORT: u16 = 80;

/// A URI split into host, port and request-target components.
///
/// `path` is never empty; it defaults to `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUri {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: String,
    pub fragment: String,
}

impl ParsedUri {
    /// Parse an `http://host[:port][/path][?query][#fragment]` URL.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUri` when the scheme is missing or not
    /// `http`, the host is empty, or the port is not in `1..=65535`.
    pub fn parse(uri: &str) -> Result<Self, ClientError> {
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| invalid(uri, "missing scheme"))?;

        if scheme.is_empty()
            || !scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            return Err(invalid(uri, "malformed scheme"));
        }
        if !scheme.eq_ignore_ascii_case("http") {
            return Err(invalid(uri, &format!("unsupported scheme: {scheme}")));
        }

        let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let (authority, remainder) = rest.split_at(authority_end);

        let (remainder, fragment) = match remainder.split_once('#') {
            Some((before, fragment)) => (before, fragment),
            None => (remainder, ""),
        };
        let (path, query) = match remainder.split_once('?') {
            Some((path, query)) => (path, query),
            None => (remainder, ""),
        };

        // userinfo never reaches the wire
        let host_port = match authority.rsplit_once('@') {
            Some((_, host_port)) => host_port,
            None => authority,
        };
        let (host, port) = split_host_port(uri, host_port)?;

        Ok(Self {
            host: host.to_string(),
            port,
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query: query.to_string(),
            fragment: fragment.to_string(),
        })
    }

    /// The request target: path, then `?query` and `#fragment` when present.
    pub fn target(&self) -> String {
        let mut target = self.path.clone();
        if !self.query.is_empty() {
            target.push('?');
            target.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            target.push('#');
            target.push_str(&self.fragment);
        }
        target
    }

    /// The value sent in the `Host` header. IPv6 literals get their brackets
    /// back; the port is never included.
    pub fn host_header(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }
}

/// Decompose `uri` into a `ParsedUri`. See `ParsedUri::parse`.
pub fn decompose(uri: &str) -> Result<ParsedUri, ClientError> {
    ParsedUri::parse(uri)
}

fn split_host_port<'a>(uri: &str, host_port: &'a str) -> Result<(&'a str, u16), ClientError> {
    let (host, port) = if let Some(stripped) = host_port.strip_prefix('[') {
        // IPv6: [::1]:8080
        let (host, after) = stripped
            .split_once(']')
            .ok_or_else(|| invalid(uri, "unterminated ipv6 literal"))?;
        let port = match after {
            "" => None,
            _ => Some(
                after
                    .strip_prefix(':')
                    .ok_or_else(|| invalid(uri, "unexpected text after ipv6 literal"))?,
            ),
        };
        (host, port)
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    if host.is_empty() {
        return Err(invalid(uri, "empty host"));
    }

    let port = match port {
        None | Some("") => DEFAULT_PORT,
        Some(port) => match port.parse::<u16>() {
            Ok(0) | Err(_) => return Err(invalid(uri, &format!("invalid port: {port}"))),
            Ok(port) => port,
        },
    };

    Ok((host, port))
}

fn invalid(uri: &str, reason: &str) -> ClientError {
    ClientError::InvalidUri(format!("{reason} in {uri:?}"))
}
