use bytes::{BufMut, Bytes, BytesMut};
use http::header::{CONNECTION, CONTENT_LENGTH, HeaderName, TRANSFER_ENCODING};
use http::{HeaderMap, HeaderValue, StatusCode};
use tracing::warn;

/// A single HTTP response under construction
///
/// Handlers drive this with the write-head / write / end surface and the
/// server encodes the finished response to wire bytes once dispatch
/// returns. When `Transfer-Encoding: chunked` is set each `write` becomes
/// one chunk frame; otherwise the writes are concatenated and sent with a
/// `Content-Length` header.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    chunks: Vec<Bytes>,
    ended: bool,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            chunks: Vec::new(),
            ended: false,
        }
    }

    /// Sets the response status
    pub fn write_head(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Sets a response header, replacing any existing value
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        if let Some(existing) = self.headers.get(&name) {
            warn!(header = %name, old = ?existing, new = ?value, "Overwriting existing header field");
        }
        self.headers.insert(name, value);
        self
    }

    /// Appends one body write
    pub fn write(&mut self, chunk: impl Into<Bytes>) -> &mut Self {
        self.chunks.push(chunk.into());
        self
    }

    /// Marks the response complete
    pub fn end(&mut self) {
        self.ended = true;
    }

    /// Sets the status, replaces the body, and ends the response
    pub fn send(&mut self, status: StatusCode, body: impl Into<Bytes>) {
        self.status = status;
        self.chunks.clear();
        self.chunks.push(body.into());
        self.ended = true;
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: HeaderName) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Concatenated body writes, before any wire framing
    pub fn body(&self) -> Bytes {
        let mut body = BytesMut::new();
        for chunk in &self.chunks {
            body.put_slice(chunk);
        }
        body.freeze()
    }

    fn is_chunked(&self) -> bool {
        self.headers
            .get(TRANSFER_ENCODING)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("chunked"))
    }

    /// Encodes the response to wire bytes
    ///
    /// Always emits `Connection: close` when the handler did not set one;
    /// the server closes the connection after each exchange.
    pub fn encode(&self) -> Bytes {
        let chunked = self.is_chunked();
        let mut buf = BytesMut::with_capacity(256);

        buf.put_slice(
            format!(
                "HTTP/1.1 {} {}\r\n",
                self.status.as_u16(),
                self.status.canonical_reason().unwrap_or("Unknown")
            )
            .as_bytes(),
        );

        for (name, value) in self.headers.iter() {
            if !chunked && *name == CONTENT_LENGTH {
                // Recomputed from the actual body below
                continue;
            }
            buf.put_slice(name.as_str().as_bytes());
            buf.put_slice(b": ");
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }
        if !self.headers.contains_key(CONNECTION) {
            buf.put_slice(b"connection: close\r\n");
        }

        if chunked {
            buf.put_slice(b"\r\n");
            for chunk in &self.chunks {
                if chunk.is_empty() {
                    // A zero-length frame would terminate the body early
                    continue;
                }
                buf.put_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
                buf.put_slice(chunk);
                buf.put_slice(b"\r\n");
            }
            buf.put_slice(b"0\r\n\r\n");
        } else {
            let body = self.body();
            buf.put_slice(format!("content-length: {}\r\n\r\n", body.len()).as_bytes());
            buf.put_slice(&body);
        }

        buf.freeze()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
