use crate::{Result, ServerError};

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, HeaderName};
use http::{HeaderMap, HeaderValue, Method};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Maximum number of request headers accepted when parsing
const MAX_HEADERS: usize = 32;

/// Request body after the body-parsing middleware has run
///
/// The variant is chosen from the request's `Content-Type`. Requests that
/// carry no body leave `Request::parsed` as `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    /// `application/json`
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`, percent-decoded key/value pairs
    Form(Vec<(String, String)>),
    /// `text/*`
    Text(String),
    /// Any other media type, left as raw bytes
    Raw(Bytes),
}

/// A single HTTP request for the lifetime of one exchange
///
/// Built by [`Request::read_from`] from the connection's byte stream.
/// Nothing in it survives past the response being written.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    /// Request target exactly as received, query string untouched
    pub path: String,
    pub headers: HeaderMap,
    /// Raw body bytes, sized by the `Content-Length` header
    pub body: Bytes,
    /// Decoded body, populated by the body-parsing middleware
    pub parsed: Option<ParsedBody>,
}

impl Request {
    /// Reads a single request from `stream`
    ///
    /// Reads until the head parses completely, then reads exactly
    /// `Content-Length` body bytes (zero when the header is absent or
    /// unparsable). Returns `Ok(None)` when the client closed the
    /// connection before sending anything.
    pub async fn read_from<S>(stream: &mut S, buffer_size: usize) -> Result<Option<Request>>
    where
        S: AsyncRead + Unpin + Send,
    {
        let mut raw: Vec<u8> = Vec::with_capacity(buffer_size);
        let mut chunk = vec![0u8; buffer_size];

        let (head_len, method, path, headers) = loop {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                if raw.is_empty() {
                    // Client closed without sending a request
                    return Ok(None);
                }
                return Err(ServerError::IncompleteRequest);
            }
            raw.extend_from_slice(&chunk[..n]);

            if let Some(head) = parse_head(&raw)? {
                break head;
            }
        };

        let content_length = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while raw.len() < head_len + content_length {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(ServerError::IncompleteRequest);
            }
            raw.extend_from_slice(&chunk[..n]);
        }

        let body = Bytes::copy_from_slice(&raw[head_len..head_len + content_length]);

        Ok(Some(Request {
            method,
            path,
            headers,
            body,
            parsed: None,
        }))
    }
}

/// Attempts to parse a request head from `raw`
///
/// Returns `Ok(None)` when more data is needed.
pub(crate) fn parse_head(raw: &[u8]) -> Result<Option<(usize, Method, String, HeaderMap)>> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut parsed = httparse::Request::new(&mut headers);

    match parsed.parse(raw) {
        Ok(httparse::Status::Complete(head_len)) => {
            let method = parsed
                .method
                .ok_or_else(|| ServerError::HttpParse("Missing request method".to_string()))?;
            let method = Method::from_bytes(method.as_bytes())
                .map_err(|_| ServerError::InvalidRequest(format!("Unsupported method {method}")))?;
            let path = parsed
                .path
                .ok_or_else(|| ServerError::HttpParse("Missing request target".to_string()))?
                .to_string();

            let mut map = HeaderMap::new();
            for header in parsed.headers.iter() {
                let name = HeaderName::from_bytes(header.name.as_bytes())
                    .map_err(|e| ServerError::HttpParse(format!("Bad header name: {e}")))?;
                let value = HeaderValue::from_bytes(header.value)
                    .map_err(|e| ServerError::HttpParse(format!("Bad header value: {e}")))?;
                map.append(name, value);
            }

            Ok(Some((head_len, method, path, map)))
        }
        Ok(httparse::Status::Partial) => Ok(None),
        Err(e) => Err(ServerError::HttpParse(format!(
            "Failed to parse request head: {e}"
        ))),
    }
}
