//! Origin fetch of the untransformed object
//!
//! One GET per invocation against the presigned URL, no retries. The body is
//! handed back unread so the pipeline can check the origin status first.

mod http;

pub use http::{HttpConfig, HttpFetcher};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use std::fmt;
use thiserror::Error;

use crate::request::{HeaderError, ReconciledHeaders};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("cannot reconcile outbound headers: {0}")]
    Headers(#[from] HeaderError),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("connection timeout")]
    Timeout,

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("failed to read body: {0}")]
    Body(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Origin response body, read at most once
#[async_trait]
pub trait OriginBody: Send {
    async fn read_all(self: Box<Self>) -> Result<Bytes>;
}

#[async_trait]
impl OriginBody for Bytes {
    async fn read_all(self: Box<Self>) -> Result<Bytes> {
        Ok(*self)
    }
}

pub struct OriginResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Box<dyn OriginBody>,
}

impl OriginResponse {
    /// Response with an already buffered body
    pub fn buffered(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: Box::new(body.into()),
        }
    }
}

impl fmt::Debug for OriginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OriginResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Transport used by the pipeline to reach the origin
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    async fn fetch(&self, url: &str, headers: &ReconciledHeaders) -> Result<OriginResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_buffered_body_reads_back() {
        let response = OriginResponse::buffered(StatusCode::OK, HeaderMap::new(), "payload");
        assert_eq!(response.status, StatusCode::OK);
        let body = response.body.read_all().await.unwrap();
        assert_eq!(&body[..], b"payload");
    }
}
