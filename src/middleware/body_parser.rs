use super::{Flow, Middleware};
use crate::http::{ParsedBody, Request, Response};
use crate::{Result, ServerError};
use async_trait::async_trait;
use http::header::CONTENT_TYPE;

/// Middleware that decodes the request body by media type
///
/// Populates [`Request::parsed`] and passes the request on. Requests
/// without a body are left untouched. A body that does not match its
/// declared media type is an error and reaches the app's error handler.
pub struct BodyParser;

impl BodyParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BodyParser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for BodyParser {
    async fn call(&self, request: &mut Request, _response: &mut Response) -> Result<Flow> {
        if request.body.is_empty() {
            return Ok(Flow::Next);
        }

        let media_type = request
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .unwrap_or("")
            .to_ascii_lowercase();

        let parsed = match media_type.as_str() {
            "application/json" => {
                let value = serde_json::from_slice(&request.body)
                    .map_err(|e| ServerError::BodyParse(format!("Invalid JSON body: {e}")))?;
                ParsedBody::Json(value)
            }
            "application/x-www-form-urlencoded" => ParsedBody::Form(parse_form(&request.body)?),
            media if media.starts_with("text/") => {
                let text = String::from_utf8(request.body.to_vec())
                    .map_err(|e| ServerError::BodyParse(format!("Body is not valid UTF-8: {e}")))?;
                ParsedBody::Text(text)
            }
            _ => ParsedBody::Raw(request.body.clone()),
        };

        request.parsed = Some(parsed);
        Ok(Flow::Next)
    }
}

fn parse_form(body: &[u8]) -> Result<Vec<(String, String)>> {
    let text = std::str::from_utf8(body)
        .map_err(|e| ServerError::BodyParse(format!("Form body is not valid UTF-8: {e}")))?;

    let mut pairs = Vec::new();
    for pair in text.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        pairs.push((decode_component(key)?, decode_component(value)?));
    }
    Ok(pairs)
}

fn decode_component(raw: &str) -> Result<String> {
    // '+' encodes a space in form bodies
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ServerError::BodyParse(format!("Bad form encoding: {e}")))
}
