//! Blocking TCP transport: one connection, one request, read until close.
//!
//! # Design
//! The stream is owned by a `Connection` value created in `exchange` and
//! dropped before it returns, so no socket outlives a single call. On the
//! normal path the write half is shut down after the response has been
//! drained; on any early return the guard's `Drop` shuts down both halves.
//!
//! Without a read timeout a peer that never closes its side blocks the
//! caller indefinitely.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// An open TCP stream scoped to one exchange.
struct Connection {
    stream: TcpStream,
    write_closed: bool,
}

impl Connection {
    fn open(host: &str, port: u16, config: &ClientConfig) -> io::Result<Self> {
        let stream = match config.connect_timeout {
            Some(timeout) => connect_with_timeout(host, port, timeout)?,
            None => TcpStream::connect((host, port))?,
        };
        stream.set_read_timeout(config.read_timeout)?;
        Ok(Self {
            stream,
            write_closed: false,
        })
    }

    fn send(&mut self, request: &[u8]) -> io::Result<()> {
        self.stream.write_all(request)?;
        self.stream.flush()
    }

    fn close_write(&mut self) {
        // the peer may already have torn the connection down
        let _ = self.stream.shutdown(Shutdown::Write);
        self.write_closed = true;
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let how = if self.write_closed {
            Shutdown::Read
        } else {
            Shutdown::Both
        };
        let _ = self.stream.shutdown(how);
    }
}

fn connect_with_timeout(host: &str, port: u16, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in (host, port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no addresses resolved for {host}:{port}"),
        )
    }))
}

/// Send `request` to `host:port` and return every byte the peer writes
/// before closing its side.
///
/// # Errors
///
/// Returns `ClientError::Connection` if the connection cannot be opened or
/// the write or any read fails (a configured timeout included).
pub fn exchange(
    host: &str,
    port: u16,
    request: &[u8],
    config: &ClientConfig,
) -> Result<Vec<u8>, ClientError> {
    debug!(host, port, "connecting");
    let mut conn = Connection::open(host, port, config)?;

    conn.send(request)?;
    debug!(bytes = request.len(), "request sent");

    let response = read_to_close(&mut conn.stream, config.read_chunk_size)?;
    debug!(bytes = response.len(), "peer closed");

    conn.close_write();
    Ok(response)
}

/// Read from `reader` in `chunk_size` pieces until a read returns zero bytes.
///
/// `ErrorKind::Interrupted` is retried; any other error is returned.
pub fn read_to_close<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return Ok(buffer),
            Ok(n) => {
                trace!(n, "read chunk");
                buffer.extend_from_slice(&chunk[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Decode response bytes as UTF-8, falling back to Latin-1 so decoding
/// never fails.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("response is not valid utf-8, decoding as latin-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    /// Reader that hands out its data a few bytes at a time and injects
    /// one `Interrupted` error.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        interrupted: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
            }
            let n = buf.len().min(3).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn read_to_close_accumulates_chunks() {
        let data = b"HTTP/1.1 200 OK\r\n\r\nbody".to_vec();
        let reader = Trickle {
            data: data.clone(),
            pos: 0,
            interrupted: false,
        };
        assert_eq!(read_to_close(reader, 2).unwrap(), data);
    }

    #[test]
    fn read_to_close_empty_stream() {
        assert!(read_to_close(io::empty(), 1024).unwrap().is_empty());
    }

    #[test]
    fn decode_valid_utf8() {
        assert_eq!(decode_text("héllo".as_bytes().to_vec()), "héllo");
    }

    #[test]
    fn decode_falls_back_to_latin1() {
        let bytes = vec![b'c', b'a', b'f', 0xE9];
        assert_eq!(decode_text(bytes), "caf\u{e9}");
    }

    #[test]
    fn exchange_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let mut received = Vec::new();
            while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                received.extend_from_slice(&buf[..n]);
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi")
                .unwrap();
            received
        });

        let request = b"GET / HTTP/1.1\r\nHost: 127.0.0.1\r\nConnection: close\r\n\r\n";
        let config = ClientConfig::default().with_read_chunk_size(4);
        let response = exchange("127.0.0.1", port, request, &config).unwrap();

        assert_eq!(response, b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi");
        assert_eq!(server.join().unwrap(), request);
    }

    #[test]
    fn exchange_refused_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = exchange("127.0.0.1", port, b"GET / HTTP/1.1\r\n\r\n", &ClientConfig::default())
            .unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }

    #[test]
    fn read_timeout_surfaces_as_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            // hold the connection open without answering
            thread::sleep(Duration::from_millis(500));
            drop(stream);
        });

        let config = ClientConfig::default().with_read_timeout(Duration::from_millis(50));
        let err = exchange("127.0.0.1", port, b"GET / HTTP/1.1\r\n\r\n", &config).unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
        server.join().unwrap();
    }
}
