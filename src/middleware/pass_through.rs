use super::{Flow, Middleware};
use crate::Result;
use crate::http::{Request, Response};
use async_trait::async_trait;

/// Middleware that forwards every request untouched
pub struct PassThrough;

#[async_trait]
impl Middleware for PassThrough {
    async fn call(&self, _request: &mut Request, _response: &mut Response) -> Result<Flow> {
        Ok(Flow::Next)
    }
}
