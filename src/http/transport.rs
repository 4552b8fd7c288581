//! Transport seam between request construction and the network

use crate::error::Result;
use crate::request::RequestDescriptor;
use async_trait::async_trait;

/// A successful (non 4xx/5xx) response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Create a 200 response with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Executes request descriptors
///
/// Implementations reject 4xx/5xx statuses with `Error::HttpStatus` so
/// callers only ever see bodies worth decoding.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and read the whole body
    async fn execute(&self, request: &RequestDescriptor) -> Result<RawResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: &RequestDescriptor) -> Result<RawResponse> {
        (**self).execute(request).await
    }
}
